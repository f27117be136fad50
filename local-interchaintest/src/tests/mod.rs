use crate::suite::{E2eTest, TestMode};

pub mod ica_messages;

/// Every e2e test, in the order the suite runs them.
pub const ALL_TESTS: &[E2eTest] = &[
    E2eTest {
        name: "contract_channel_handshake",
        mode: TestMode::Connected,
        run: channel_handshake::test_contract_channel_handshake,
    },
    E2eTest {
        name: "relayer_channel_handshake",
        mode: TestMode::Connected,
        run: channel_handshake::test_relayer_channel_handshake,
    },
    E2eTest {
        name: "localhost_channel_handshake",
        mode: TestMode::Localhost,
        run: channel_handshake::test_localhost_channel_handshake,
    },
    E2eTest {
        name: "ica_bank_send",
        mode: TestMode::Both,
        run: ica_messages::test_ica_bank_send,
    },
    E2eTest {
        name: "ica_stargate_and_staking",
        mode: TestMode::Both,
        run: ica_messages::test_ica_stargate_and_staking,
    },
    E2eTest {
        name: "ica_queries",
        mode: TestMode::Both,
        run: ica_messages::test_ica_queries,
    },
    E2eTest {
        name: "ica_ibc_transfer",
        mode: TestMode::Connected,
        run: ica_messages::test_ica_ibc_transfer,
    },
    E2eTest {
        name: "ica_error_ack",
        mode: TestMode::Both,
        run: ica_messages::test_ica_error_ack,
    },
    E2eTest {
        name: "update_callback_address",
        mode: TestMode::Both,
        run: ica_messages::test_update_callback_address,
    },
    E2eTest {
        name: "packet_timeout_and_reopen",
        mode: TestMode::Connected,
        run: packet_lifecycle::test_packet_timeout_and_reopen,
    },
    E2eTest {
        name: "close_channel_and_reopen",
        mode: TestMode::Both,
        run: packet_lifecycle::test_close_channel_and_reopen,
    },
    E2eTest {
        name: "owner_creates_ica_contract",
        mode: TestMode::Both,
        run: owner_contract::test_owner_creates_ica_contract,
    },
    E2eTest {
        name: "update_ownership",
        mode: TestMode::Both,
        run: ownership::test_update_ownership,
    },
    E2eTest {
        name: "migrate_contract",
        mode: TestMode::Both,
        run: ownership::test_migrate_contract,
    },
];

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    #[test]
    fn test_names_are_unique() {
        let names: HashSet<_> = ALL_TESTS.iter().map(|test| test.name).collect();
        assert_eq!(names.len(), ALL_TESTS.len());
    }

    #[test]
    fn test_every_mode_has_tests() {
        assert!(ALL_TESTS.iter().any(|test| test.mode.runs_in(true)));
        assert!(ALL_TESTS.iter().any(|test| test.mode.runs_in(false)));
    }
}
