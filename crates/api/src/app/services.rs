use anyhow::Context;
use sqlx::postgres::PgPoolOptions;

use catalog_infra::{CatalogQueryService, ProductCompositionService, Repositories};

use crate::config::StoreBackend;

/// Services shared by every handler.
#[derive(Clone)]
pub struct AppServices {
    pub composition: ProductCompositionService,
    pub query: CatalogQueryService,
}

impl AppServices {
    pub fn new(repos: Repositories) -> Self {
        Self {
            composition: ProductCompositionService::new(repos.clone()),
            query: CatalogQueryService::new(repos),
        }
    }
}

pub async fn build_services(store: &StoreBackend) -> anyhow::Result<AppServices> {
    let repos = match store {
        StoreBackend::InMemory => {
            tracing::info!("using in-memory document stores");
            Repositories::in_memory()
        }
        StoreBackend::Postgres {
            database_url,
            max_connections,
        } => {
            let pool = PgPoolOptions::new()
                .max_connections(*max_connections)
                .connect(database_url)
                .await
                .context("failed to connect to Postgres")?;
            let repos = Repositories::postgres(pool)
                .await
                .context("failed to prepare catalog collections")?;
            tracing::info!(max_connections, "using Postgres document stores");
            repos
        }
    };

    Ok(AppServices::new(repos))
}
