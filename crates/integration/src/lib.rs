//! End-to-end test harness: tester types per query, record builders and the
//! logging setup shared by the `tests/` suites.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use zkquery_engine::{execute, QueryDefinition, QueryOutput, QueryWitness};

pub mod testers;

/// A query under test: its definition and a witness that should satisfy it.
pub trait QueryTester {
    /// Name used in logs.
    const NAME: &str;

    /// The definition being exercised.
    fn definition() -> QueryDefinition;

    /// A witness expected to verify against [`Self::definition`].
    fn witness() -> QueryWitness;

    /// Setup for the test suite.
    fn setup() -> eyre::Result<()> {
        setup_logger();
        Ok(())
    }
}

/// Run a tester's query end to end.
pub fn run_query<T: QueryTester>() -> eyre::Result<QueryOutput> {
    let definition = T::definition();
    let witness = T::witness();
    tracing::info!(tester = T::NAME, "running query");
    Ok(execute(&definition, &witness)?)
}

/// Setup tracing subscriber; later calls are no-ops so every test can run
/// it unconditionally.
fn setup_logger() {
    let fmt_layer = tracing_subscriber::fmt::layer().pretty();
    let _ = tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .with(fmt_layer)
        .try_init();
}
