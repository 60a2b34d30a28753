//! Dashboard query pipeline
//!
//! One request: resolve the window, read the three counting records
//! concurrently, run both aggregators, compose the summary. Requests
//! share nothing; each performs its own reads.

use crate::domain::types::{ClassMultipliers, GateSource};
use crate::domain::window::{ParameterError, TimeWindow, WindowParams};
use crate::infra::Config;
use crate::io::store::CountingStore;
use crate::services::people::aggregate_people;
use crate::services::summary::{compose, Summary};
use crate::services::vehicles::{classify_source, count_source};
use chrono::{Local, NaiveDate};
use std::fmt;
use std::sync::Arc;
use tracing::debug;

/// Why a dashboard query failed
#[derive(Debug)]
pub enum QueryError {
    /// Backing store was unreachable at startup; the service runs
    /// degraded and every query answers this until restart
    Disconnected,
    /// Malformed date/time request parameters
    Parameter(ParameterError),
    /// Store read or decode failure
    Unexpected(anyhow::Error),
}

impl fmt::Display for QueryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QueryError::Disconnected => write!(f, "database connection failed"),
            QueryError::Parameter(e) => write!(f, "{e}"),
            QueryError::Unexpected(e) => write!(f, "{e}"),
        }
    }
}

impl std::error::Error for QueryError {}

impl From<ParameterError> for QueryError {
    fn from(e: ParameterError) -> Self {
        QueryError::Parameter(e)
    }
}

/// The aggregation engine with its injected store dependency
pub struct Dashboard {
    store: Arc<dyn CountingStore>,
    designated_stream: String,
    multipliers: ClassMultipliers,
}

impl Dashboard {
    pub fn new(store: Arc<dyn CountingStore>, config: &Config) -> Self {
        Self {
            store,
            designated_stream: config.designated_stream().to_string(),
            multipliers: config.multipliers().clone(),
        }
    }

    /// Answer one dashboard request, with "today" read from the clock
    pub async fn query(&self, params: &WindowParams) -> Result<Summary, QueryError> {
        self.query_at(params, Local::now().date_naive()).await
    }

    /// Answer one dashboard request with an explicit "today"
    ///
    /// `today` is what live mode matches against; passed in so callers
    /// and tests control it, like `aggregate_people` does.
    pub async fn query_at(
        &self,
        params: &WindowParams,
        today: NaiveDate,
    ) -> Result<Summary, QueryError> {
        if !self.store.connected() {
            return Err(QueryError::Disconnected);
        }

        let window = TimeWindow::resolve(params)?;
        debug!(window = ?window, "dashboard_query");

        let (people, vip, front) = tokio::join!(
            self.store.people_record(),
            self.store.vehicle_record(GateSource::Vip),
            self.store.vehicle_record(GateSource::Front),
        );
        let people = people.map_err(QueryError::Unexpected)?;
        let vip = vip.map_err(QueryError::Unexpected)?;
        let front = front.map_err(QueryError::Unexpected)?;

        let totals =
            aggregate_people(people.as_ref(), &window, today, &self.designated_stream);
        let breakdown = classify_source(vip.as_ref(), &window, &self.multipliers);
        let front_count = count_source(front.as_ref(), &window);

        Ok(compose(totals, breakdown, front_count))
    }
}
