use std::{
    any::Any,
    panic::{self, AssertUnwindSafe},
    time::{Duration, Instant},
};

use cosmwasm_std::IbcOrder;
use ica_types::{
    callback_counter,
    controller::{self, ChannelOpenInitOptions, ChannelStatus, IcaInfo},
};
use localic_std::{errors::LocalError, polling::poll_for_start};
use log::{error, info, warn};
use reqwest::blocking::Client;

use crate::{
    helpers::{callback_counter::CallbackCounterContract, ica_controller::IcaContract},
    utils::{
        config::SuiteConfig,
        constants::{
            ACC_0_KEY, ACC_1_KEY, CALLBACK_COUNTER_CONTRACT, CONTROLLER_CHAIN_ID,
            FUND_AMOUNT, HANDSHAKE_TIMEOUT, HOST_CHAIN_ID, IBC_PATH, ICA_CONTROLLER_CONTRACT,
            ICA_FUND_AMOUNT, ICS20_VERSION, SETUP_WAIT_BLOCKS, START_POLL_ATTEMPTS,
            TRANSFER_PORT,
        },
        custom_error,
        diagnostics::collect_diagnostics,
        file_system::read_json_file,
        ibc::{create_channel, create_connection, start_relayer},
        polling::wait_for_blocks,
        setup::{deploy_contracts_on_chain, fund_accounts},
        test_context::{LocalChain, TestContext},
        types::ChainsVec,
    },
};

pub type TestFn = fn(&TestSuite) -> Result<(), LocalError>;

/// Topology a test needs in order to run.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum TestMode {
    /// controller and host are two chains connected by the relayer
    Connected,
    /// both ends of the ICA channel live on the controller chain
    Localhost,
    Both,
}

impl TestMode {
    pub fn runs_in(self, localhost: bool) -> bool {
        match self {
            TestMode::Connected => !localhost,
            TestMode::Localhost => localhost,
            TestMode::Both => true,
        }
    }
}

#[derive(Debug)]
pub struct E2eTest {
    pub name: &'static str,
    pub mode: TestMode,
    pub run: TestFn,
}

#[derive(Debug)]
pub struct TestOutcome {
    pub name: &'static str,
    pub elapsed: Duration,
    pub result: Result<(), String>,
}

pub struct TestSuite {
    pub config: SuiteConfig,
    pub test_ctx: TestContext,
    pub ibc_path: String,
}

/// A controller with an open channel and a counter receiving its callbacks.
pub struct IcaFixture<'a> {
    pub ica: IcaContract<'a>,
    pub counter: CallbackCounterContract<'a>,
    pub ica_info: IcaInfo,
}

impl TestSuite {
    /// Brings the environment to the state every test starts from: chains reachable,
    /// IBC topology known, accounts funded and contracts stored.
    pub fn setup(config: SuiteConfig) -> Result<Self, LocalError> {
        let client = Client::new();
        if poll_for_start(&client, &config.api_url, START_POLL_ATTEMPTS).is_err() {
            return Err(custom_error(format!(
                "local-ic did not come up at {}",
                config.api_url
            )));
        }

        let chains = read_json_file(&config.chain_config_path).map_err(|e| {
            custom_error(format!(
                "failed to read {}: {e}",
                config.chain_config_path.display()
            ))
        })?;
        let ibc_path = ibc_path(&chains);
        let test_ctx = TestContext::new(chains, &config)?;

        let mut suite = Self {
            config,
            test_ctx,
            ibc_path,
        };

        if suite.config.localhost {
            info!("using the localhost connection on {CONTROLLER_CHAIN_ID}");
            suite.test_ctx.use_localhost(CONTROLLER_CHAIN_ID);
        } else {
            suite.connect_chains()?;
        }
        start_relayer(suite.test_ctx.get_request_builder(CONTROLLER_CHAIN_ID)?)?;

        suite.fund_test_accounts()?;

        let artifacts_dir = suite.config.artifacts_dir.clone();
        deploy_contracts_on_chain(&mut suite.test_ctx, &artifacts_dir, CONTROLLER_CHAIN_ID)?;

        wait_for_blocks(
            suite.test_ctx.get_request_builder(CONTROLLER_CHAIN_ID)?,
            SETUP_WAIT_BLOCKS,
        )?;
        info!("suite setup complete");

        Ok(suite)
    }

    fn connect_chains(&mut self) -> Result<(), LocalError> {
        if let Err(e) = self.test_ctx.discover_topology(CONTROLLER_CHAIN_ID, HOST_CHAIN_ID) {
            info!("creating connection on {}: {e:?}", self.ibc_path);
            create_connection(
                self.test_ctx.get_request_builder(CONTROLLER_CHAIN_ID)?,
                &self.ibc_path,
            )?;
            self.test_ctx
                .discover_topology(CONTROLLER_CHAIN_ID, HOST_CHAIN_ID)?;
        }

        let has_transfer_channel = self
            .test_ctx
            .get_transfer_channels()
            .src(CONTROLLER_CHAIN_ID)
            .dest(HOST_CHAIN_ID)
            .get()
            .is_ok();
        if !has_transfer_channel {
            info!("creating transfer channel on {}", self.ibc_path);
            create_channel(
                self.test_ctx.get_request_builder(CONTROLLER_CHAIN_ID)?,
                &self.ibc_path,
                TRANSFER_PORT,
                TRANSFER_PORT,
                "unordered",
                ICS20_VERSION,
            )?;
            self.test_ctx
                .discover_topology(CONTROLLER_CHAIN_ID, HOST_CHAIN_ID)?;
        }

        Ok(())
    }

    fn fund_test_accounts(&self) -> Result<(), LocalError> {
        let mut chain_ids = vec![CONTROLLER_CHAIN_ID];
        if !self.config.localhost {
            chain_ids.push(HOST_CHAIN_ID);
        }

        for chain_id in chain_ids {
            let user = self.test_ctx.get_chain(chain_id)?.account(ACC_1_KEY)?;
            fund_accounts(&self.test_ctx, chain_id, &[user], FUND_AMOUNT)?;
        }
        Ok(())
    }

    /// Runs `tests` in order, collecting diagnostics for every failure.
    pub fn run(&self, tests: &[&E2eTest]) -> Vec<TestOutcome> {
        let mut outcomes = vec![];
        for test in tests {
            if !test.mode.runs_in(self.config.localhost) {
                info!("skipping {} ({:?} only)", test.name, test.mode);
                continue;
            }

            info!("running {}", test.name);
            let start = Instant::now();
            let result = match panic::catch_unwind(AssertUnwindSafe(|| (test.run)(self))) {
                Ok(Ok(())) => Ok(()),
                Ok(Err(e)) => Err(format!("{e:?}")),
                Err(payload) => Err(panic_message(payload.as_ref())),
            };
            let elapsed = start.elapsed();

            match &result {
                Ok(()) => info!("{} passed in {elapsed:?}", test.name),
                Err(e) => {
                    error!("{} failed in {elapsed:?}: {e}", test.name);
                    match collect_diagnostics(&self.config, test.name) {
                        Ok(dir) => info!("diagnostics written to {}", dir.display()),
                        Err(e) => warn!("failed to collect diagnostics: {e:#}"),
                    }
                }
            }

            outcomes.push(TestOutcome {
                name: test.name,
                elapsed,
                result,
            });
        }
        outcomes
    }

    pub fn controller(&self) -> Result<&LocalChain, LocalError> {
        self.test_ctx.get_chain(CONTROLLER_CHAIN_ID)
    }

    /// Chain hosting the interchain accounts. The controller itself in localhost mode.
    pub fn host(&self) -> Result<&LocalChain, LocalError> {
        self.test_ctx.get_chain(self.host_chain_id())
    }

    pub fn host_chain_id(&self) -> &'static str {
        if self.config.localhost {
            CONTROLLER_CHAIN_ID
        } else {
            HOST_CHAIN_ID
        }
    }

    pub fn channel_open_init_options(&self) -> Result<ChannelOpenInitOptions, LocalError> {
        let connection_id = self
            .test_ctx
            .get_connections()
            .src(CONTROLLER_CHAIN_ID)
            .dest(self.host_chain_id())
            .get()?;
        let counterparty_connection_id = self
            .test_ctx
            .get_connections()
            .src(self.host_chain_id())
            .dest(CONTROLLER_CHAIN_ID)
            .get()?;

        Ok(ChannelOpenInitOptions::new(
            connection_id,
            counterparty_connection_id,
        ))
    }

    pub fn instantiate_counter(&self) -> Result<CallbackCounterContract<'_>, LocalError> {
        let controller = self.controller()?;
        CallbackCounterContract::instantiate(
            &controller.rb,
            ACC_0_KEY,
            controller.code_id(CALLBACK_COUNTER_CONTRACT)?,
            &callback_counter::InstantiateMsg {},
            CALLBACK_COUNTER_CONTRACT,
            None,
        )
    }

    /// Instantiates a controller owned by the admin account, which starts the
    /// channel handshake right away.
    pub fn instantiate_ica(
        &self,
        counter: Option<&CallbackCounterContract>,
        ordering: IbcOrder,
    ) -> Result<IcaContract<'_>, LocalError> {
        let controller = self.controller()?;
        let msg = controller::InstantiateMsg {
            owner: None,
            channel_open_init_options: self.channel_open_init_options()?.with_ordering(ordering),
            send_callbacks_to: counter.map(|c| c.address.clone()),
        };

        IcaContract::instantiate(
            &controller.rb,
            ACC_0_KEY,
            controller.code_id(ICA_CONTROLLER_CONTRACT)?,
            &msg,
            ICA_CONTROLLER_CONTRACT,
            Some(&controller.admin_addr),
        )
    }

    /// Controller plus counter, with the channel open and the ICA funded on the host.
    pub fn setup_ica(&self, ordering: IbcOrder) -> Result<IcaFixture<'_>, LocalError> {
        let counter = self.instantiate_counter()?;
        let ica = self.instantiate_ica(Some(&counter), ordering)?;

        ica.wait_for_channel_status(ChannelStatus::Open, HANDSHAKE_TIMEOUT)?;
        let ica_info = ica.wait_for_ica_info(HANDSHAKE_TIMEOUT)?;
        info!("interchain account {} on {}", ica_info.ica_address, ica_info.channel_id);

        self.fund_on_host(&ica_info.ica_address, ICA_FUND_AMOUNT)?;

        Ok(IcaFixture {
            ica,
            counter,
            ica_info,
        })
    }

    pub fn fund_on_host(&self, address: &str, amount: u128) -> Result<(), LocalError> {
        fund_accounts(&self.test_ctx, self.host_chain_id(), &[address], amount)
    }
}

/// Relayer path between the controller and the host, as configured for local-ic.
fn ibc_path(chains: &ChainsVec) -> String {
    chains
        .get(CONTROLLER_CHAIN_ID)
        .and_then(|chain| chain.ibc_paths.as_ref())
        .and_then(|paths| paths.first())
        .cloned()
        .unwrap_or_else(|| IBC_PATH.to_string())
}

pub fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(msg) = payload.downcast_ref::<&str>() {
        msg.to_string()
    } else if let Some(msg) = payload.downcast_ref::<String>() {
        msg.clone()
    } else {
        "test panicked".to_string()
    }
}

/// Picks the tests named in `filter`, or all of them if the filter is empty.
pub fn select_tests<'a>(
    tests: &'a [E2eTest],
    filter: &[String],
) -> Result<Vec<&'a E2eTest>, String> {
    if filter.is_empty() {
        return Ok(tests.iter().collect());
    }

    filter
        .iter()
        .map(|name| {
            tests
                .iter()
                .find(|test| test.name == name)
                .ok_or_else(|| format!("unknown test {name}"))
        })
        .collect()
}
