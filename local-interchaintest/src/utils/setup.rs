use std::path::Path;

use cosmwasm_std::Coin;
use localic_std::{
    errors::LocalError,
    modules::{bank, cosmwasm::CosmWasm},
};
use log::info;

use super::{
    constants::ACC_0_KEY, custom_error, file_system::contract_name,
    file_system::wasm_artifacts, test_context::TestContext,
};

/// Stores every `.wasm` under `artifacts` on `chain`, skipping contracts
/// already stored during this run.
pub fn deploy_contracts_on_chain(
    test_ctx: &mut TestContext,
    artifacts: &Path,
    chain: &str,
) -> Result<(), LocalError> {
    let wasm_files = wasm_artifacts(artifacts).map_err(|e| {
        custom_error(format!("failed to read artifacts in {}: {e}", artifacts.display()))
    })?;
    if wasm_files.is_empty() {
        return Err(custom_error(format!(
            "no wasm artifacts found in {}",
            artifacts.display()
        )));
    }

    for path in wasm_files {
        let id = contract_name(&path)
            .ok_or_else(|| custom_error(format!("invalid artifact name {}", path.display())))?;

        if test_ctx.get_chain(chain)?.contract_codes.contains_key(&id) {
            info!("contract {id} already stored on {chain}, skipping");
            continue;
        }

        let code_id = store_contract(test_ctx, chain, &path)?;
        test_ctx
            .get_mut_chain(chain)?
            .contract_codes
            .insert(id, code_id);
    }

    Ok(())
}

/// Stores `path` on `chain` unconditionally and returns the new code id.
pub fn store_contract(test_ctx: &TestContext, chain: &str, path: &Path) -> Result<u64, LocalError> {
    let abs_path = path.canonicalize().map_err(custom_error)?;
    let local_chain = test_ctx.get_chain(chain)?;

    let mut cw = CosmWasm::new(&local_chain.rb);
    let code_id = cw.store(ACC_0_KEY, abs_path.as_path())?;
    info!("stored {} on {chain} with code id {code_id}", abs_path.display());

    Ok(code_id)
}

/// Sends `amount` of the native denom from the funder key to every recipient.
pub fn fund_accounts(
    test_ctx: &TestContext,
    chain: &str,
    recipients: &[&str],
    amount: u128,
) -> Result<(), LocalError> {
    let local_chain = test_ctx.get_chain(chain)?;
    let denom = &local_chain.native_denom;

    for recipient in recipients {
        bank::send(
            &local_chain.rb,
            ACC_0_KEY,
            recipient,
            &[Coin::new(amount, denom)],
            &Coin::new(5000, denom),
        )?;
        info!("funded {recipient} with {amount}{denom} on {chain}");
    }

    Ok(())
}
