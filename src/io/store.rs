//! Counting store client
//!
//! The engine only reads three singleton documents; the trait keeps it
//! testable without a live database. `MongoStore` is the production
//! implementation.
//!
//! Connection failure at startup is not fatal: the service comes up
//! degraded with `connected() == false` and every query reports the
//! connection failure instead of the process crashing.

use crate::domain::types::{GateSource, PeopleRecord, VehicleRecord};
use crate::infra::config::StoreConfig;
use anyhow::Context;
use async_trait::async_trait;
use mongodb::bson::doc;
use mongodb::{Client, Collection};
use tracing::{error, info};

/// Read access to the counting records
#[async_trait]
pub trait CountingStore: Send + Sync {
    /// Whether the backing store was reachable at startup
    fn connected(&self) -> bool;

    /// The singleton people-counting record, if present
    async fn people_record(&self) -> anyhow::Result<Option<PeopleRecord>>;

    /// The singleton vehicle record for one gate source, if present
    async fn vehicle_record(&self, source: GateSource) -> anyhow::Result<Option<VehicleRecord>>;
}

struct Collections {
    people: Collection<PeopleRecord>,
    vip: Collection<VehicleRecord>,
    front: Collection<VehicleRecord>,
}

/// MongoDB-backed store
pub struct MongoStore {
    // None when the startup connection attempt failed (degraded mode)
    collections: Option<Collections>,
    people_doc_id: String,
    vehicle_doc_id: String,
}

impl MongoStore {
    /// Connect and ping. A failure leaves the store in degraded mode
    /// rather than propagating.
    pub async fn connect(config: &StoreConfig) -> Self {
        let collections = match Self::open(config).await {
            Ok(collections) => {
                info!(database = %config.database, "store_connected");
                Some(collections)
            }
            Err(e) => {
                error!(error = %e, database = %config.database, "store_connect_failed");
                None
            }
        };

        Self {
            collections,
            people_doc_id: config.people_doc_id.clone(),
            vehicle_doc_id: config.vehicle_doc_id.clone(),
        }
    }

    async fn open(config: &StoreConfig) -> anyhow::Result<Collections> {
        let client = Client::with_uri_str(&config.uri)
            .await
            .context("failed to build store client")?;
        let db = client.database(&config.database);

        // The client connects lazily; ping now so degraded mode is
        // decided at startup, not on the first request.
        db.run_command(doc! { "ping": 1 })
            .await
            .context("store ping failed")?;

        Ok(Collections {
            people: db.collection(&config.people_collection),
            vip: db.collection(&config.vip_collection),
            front: db.collection(&config.front_collection),
        })
    }

    fn collections(&self) -> anyhow::Result<&Collections> {
        self.collections
            .as_ref()
            .ok_or_else(|| anyhow::anyhow!("store not connected"))
    }
}

#[async_trait]
impl CountingStore for MongoStore {
    fn connected(&self) -> bool {
        self.collections.is_some()
    }

    async fn people_record(&self) -> anyhow::Result<Option<PeopleRecord>> {
        let collections = self.collections()?;
        collections
            .people
            .find_one(doc! { "_id": &self.people_doc_id })
            .await
            .context("failed to read people record")
    }

    async fn vehicle_record(&self, source: GateSource) -> anyhow::Result<Option<VehicleRecord>> {
        let collections = self.collections()?;
        let collection = match source {
            GateSource::Vip => &collections.vip,
            GateSource::Front => &collections.front,
        };
        collection
            .find_one(doc! { "_id": &self.vehicle_doc_id })
            .await
            .with_context(|| format!("failed to read {} vehicle record", source.as_str()))
    }
}
