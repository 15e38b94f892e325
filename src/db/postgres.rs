//! Postgres persistence for signal state and daily evaluation snapshots

use crate::config;
use crate::models::evaluation::DailyEvaluation;
use crate::models::signal::{SignalName, SignalState};
use chrono::NaiveDate;
use std::sync::Arc;
use tokio::sync::RwLock;
use tokio_postgres::{Client, NoTls, Row};

pub type DbResult<T> = Result<T, Box<dyn std::error::Error + Send + Sync>>;

fn db_error(context: &str, e: impl std::fmt::Display) -> Box<dyn std::error::Error + Send + Sync> {
    Box::new(std::io::Error::other(format!("{}: {}", context, e)))
}

pub struct PostgresDatabase {
    client: Arc<RwLock<Option<Client>>>,
}

impl PostgresDatabase {
    pub async fn new() -> DbResult<Self> {
        Self::connect(&config::get_database_url()).await
    }

    pub async fn connect(database_url: &str) -> DbResult<Self> {
        let (client, connection) = tokio_postgres::connect(database_url, NoTls)
            .await
            .map_err(|e| {
                Box::new(std::io::Error::new(
                    std::io::ErrorKind::ConnectionRefused,
                    format!("Failed to connect to Postgres: {}", e),
                )) as Box<dyn std::error::Error + Send + Sync>
            })?;

        tokio::spawn(async move {
            if let Err(e) = connection.await {
                tracing::error!(error = %e, "Postgres connection error");
            }
        });

        let db = Self {
            client: Arc::new(RwLock::new(Some(client))),
        };
        db.init_schema().await?;

        Ok(db)
    }

    async fn init_schema(&self) -> DbResult<()> {
        let client = self.client.read().await;
        if let Some(ref c) = *client {
            c.batch_execute(
                "CREATE TABLE IF NOT EXISTS signal_state (
                    name TEXT PRIMARY KEY,
                    active BOOLEAN NOT NULL,
                    activated_on DATE,
                    last_condition_met_on DATE,
                    last_evaluated_on DATE,
                    deactivated_on DATE,
                    last_activated_on DATE,
                    updated_at TIMESTAMPTZ NOT NULL DEFAULT now()
                );
                ALTER TABLE signal_state ADD COLUMN IF NOT EXISTS last_activated_on DATE;
                CREATE TABLE IF NOT EXISTS daily_snapshots (
                    id BIGSERIAL PRIMARY KEY,
                    evaluation_date DATE NOT NULL,
                    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
                    payload TEXT NOT NULL
                );
                CREATE INDEX IF NOT EXISTS daily_snapshots_date_idx
                    ON daily_snapshots (evaluation_date DESC, id DESC);",
            )
            .await
            .map_err(|e| db_error("Failed to initialize schema", e))?;
        }

        Ok(())
    }

    fn row_to_state(row: &Row) -> DbResult<SignalState> {
        let name: String = row.get(0);
        Ok(SignalState {
            name: name.parse::<SignalName>()?,
            active: row.get(1),
            activated_on: row.get::<_, Option<NaiveDate>>(2),
            last_condition_met_on: row.get::<_, Option<NaiveDate>>(3),
            last_evaluated_on: row.get::<_, Option<NaiveDate>>(4),
            deactivated_on: row.get::<_, Option<NaiveDate>>(5),
            last_activated_on: row.get::<_, Option<NaiveDate>>(6),
        })
    }

    /// All persisted signal states. Unknown signal names are an error.
    pub async fn load_states(&self) -> DbResult<Vec<SignalState>> {
        let client = self.client.read().await;
        if let Some(ref c) = *client {
            let rows = c
                .query(
                    "SELECT name, active, activated_on, last_condition_met_on,
                            last_evaluated_on, deactivated_on, last_activated_on
                     FROM signal_state
                     ORDER BY name",
                    &[],
                )
                .await
                .map_err(|e| db_error("Failed to query signal_state", e))?;

            rows.iter().map(Self::row_to_state).collect()
        } else {
            Ok(Vec::new())
        }
    }

    /// Upsert signal states and append the evaluation snapshot in one
    /// transaction.
    pub async fn persist_run(
        &self,
        states: &[SignalState],
        evaluation: &DailyEvaluation,
    ) -> DbResult<()> {
        let payload = serde_json::to_string(evaluation).map_err(|e| {
            Box::new(std::io::Error::new(
                std::io::ErrorKind::InvalidData,
                format!("Failed to serialize evaluation: {}", e),
            )) as Box<dyn std::error::Error + Send + Sync>
        })?;

        let mut client = self.client.write().await;
        if let Some(ref mut c) = *client {
            let tx = c
                .transaction()
                .await
                .map_err(|e| db_error("Failed to begin transaction", e))?;

            for state in states {
                tx.execute(
                    "INSERT INTO signal_state (name, active, activated_on, last_condition_met_on,
                                               last_evaluated_on, deactivated_on,
                                               last_activated_on, updated_at)
                     VALUES ($1, $2, $3, $4, $5, $6, $7, now())
                     ON CONFLICT (name) DO UPDATE SET
                        active = EXCLUDED.active,
                        activated_on = EXCLUDED.activated_on,
                        last_condition_met_on = EXCLUDED.last_condition_met_on,
                        last_evaluated_on = EXCLUDED.last_evaluated_on,
                        deactivated_on = EXCLUDED.deactivated_on,
                        last_activated_on = EXCLUDED.last_activated_on,
                        updated_at = now()",
                    &[
                        &state.name.as_str(),
                        &state.active,
                        &state.activated_on,
                        &state.last_condition_met_on,
                        &state.last_evaluated_on,
                        &state.deactivated_on,
                        &state.last_activated_on,
                    ],
                )
                .await
                .map_err(|e| db_error("Failed to upsert signal state", e))?;
            }

            tx.execute(
                "INSERT INTO daily_snapshots (evaluation_date, payload) VALUES ($1, $2)",
                &[&evaluation.date, &payload],
            )
            .await
            .map_err(|e| db_error("Failed to store snapshot", e))?;

            tx.commit()
                .await
                .map_err(|e| db_error("Failed to commit run", e))?;
        }

        Ok(())
    }

    /// Most recent stored evaluation, if any.
    pub async fn latest_snapshot(&self) -> DbResult<Option<DailyEvaluation>> {
        let client = self.client.read().await;
        if let Some(ref c) = *client {
            let row = c
                .query_opt(
                    "SELECT payload FROM daily_snapshots
                     ORDER BY evaluation_date DESC, id DESC
                     LIMIT 1",
                    &[],
                )
                .await
                .map_err(|e| db_error("Failed to query daily_snapshots", e))?;

            match row {
                Some(row) => {
                    let payload: String = row.get(0);
                    let evaluation = serde_json::from_str(&payload)
                        .map_err(|e| db_error("Failed to decode snapshot", e))?;
                    Ok(Some(evaluation))
                }
                None => Ok(None),
            }
        } else {
            Ok(None)
        }
    }

    pub async fn is_available(&self) -> bool {
        let client = self.client.read().await;
        client.as_ref().map(|c| !c.is_closed()).unwrap_or(false)
    }
}
