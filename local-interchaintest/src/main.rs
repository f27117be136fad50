use std::{env, process::ExitCode};

use anyhow::anyhow;
use local_ictest_e2e::{
    suite::{select_tests, TestSuite},
    tests::ALL_TESTS,
    utils::config::SuiteConfig,
};
use log::{error, info};

// local-ic start ica --api-port 42069
// cargo run -p local-ictest-e2e -- [test names]
fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    match run() {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            error!("{e:#}");
            ExitCode::FAILURE
        }
    }
}

fn run() -> anyhow::Result<bool> {
    let filter: Vec<String> = env::args().skip(1).collect();
    let tests = select_tests(ALL_TESTS, &filter).map_err(|e| anyhow!(e))?;

    let config = SuiteConfig::from_env();
    info!("running {} tests with {config:?}", tests.len());

    let suite = TestSuite::setup(config).map_err(|e| anyhow!("suite setup failed: {e:?}"))?;
    let outcomes = suite.run(&tests);

    let failed: Vec<_> = outcomes.iter().filter(|o| o.result.is_err()).collect();
    info!(
        "{} passed, {} failed",
        outcomes.len() - failed.len(),
        failed.len()
    );
    for outcome in &failed {
        if let Err(e) = &outcome.result {
            error!("FAILED {} ({:?}): {e}", outcome.name, outcome.elapsed);
        }
    }

    Ok(failed.is_empty())
}
