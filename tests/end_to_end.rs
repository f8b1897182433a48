//! Cross-module scenarios: key lifecycle across processes, sharing, the
//! read path over real sockets with endpoint fallback, and the write path's
//! terminal transitions.

mod common;

use std::sync::atomic::Ordering;
use std::sync::Arc;

use alloy::primitives::{Address, U256};
use k256::SecretKey;
use rand::rngs::OsRng;

use healthvault_core::config::schema::LedgerConfig;
use healthvault_core::keys::exchange::{public_key_hex, unwrap_category_key, wrap_category_key};
use healthvault_core::keys::{open, seal, KeyCache};
use healthvault_core::records::types::{AccessLevel, ShareStatus};
use healthvault_core::rpc::RpcMultiplexer;
use healthvault_core::tx::dispatcher::TxDispatcher;
use healthvault_core::{
    Category, HealthVault, ProviderResponse, SubmitOutcome, VaultError,
};

use common::{spawn_http_error_server, spawn_rpc_server, ScriptedProvider};

const WALLET: &str = "0xAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAA";
const CONTRACT: &str = "0x2222222222222222222222222222222222222222";

fn ledger_config(endpoints: Vec<String>) -> LedgerConfig {
    LedgerConfig {
        endpoints,
        contract_address: CONTRACT.to_string(),
        chain_id: 1,
        call_timeout_secs: 2,
        provider_deadline_secs: 1,
        ..LedgerConfig::default()
    }
}

fn write_slot(buf: &mut [u8], offset: usize, value: u64) {
    buf[offset..offset + 32].copy_from_slice(&U256::from(value).to_be_bytes::<32>());
}

fn write_str(buf: &mut [u8], offset: usize, s: &str) {
    write_slot(buf, offset, s.len() as u64);
    buf[offset + 32..offset + 32 + s.len()].copy_from_slice(s.as_bytes());
}

#[test]
fn test_seal_survives_process_restart() {
    // Derive the Medical-Reports key, encrypt, then re-derive from scratch
    // (fresh cache, same wallet) and decrypt. Nothing but the wallet
    // address persists between the two halves.
    let cache = KeyCache::new(None);
    cache.set_wallet(WALLET).unwrap();
    let k1 = cache.category_key(Category::MedicalReports).unwrap();
    let blob = seal(&k1.key, b"patient note").unwrap();
    drop(cache);

    let fresh = KeyCache::new(None);
    fresh.set_wallet(WALLET).unwrap();
    let k2 = fresh.category_key(Category::MedicalReports).unwrap();
    assert_eq!(open(&k2.key, &blob).unwrap(), b"patient note");
}

#[test]
fn test_share_flow_owner_to_recipient() {
    // Owner derives a category key, wraps it for the recipient; the
    // recipient unwraps with the commuted ECDH inputs and can open content
    // sealed under the category key.
    let cache = KeyCache::new(None);
    cache.set_wallet(WALLET).unwrap();
    let category_key = cache.category_key(Category::MedicationRecords).unwrap().key;

    let owner = SecretKey::random(&mut OsRng);
    let recipient = SecretKey::random(&mut OsRng);

    let envelope =
        wrap_category_key(&category_key, &owner, &public_key_hex(&recipient.public_key()))
            .unwrap();
    let unwrapped =
        unwrap_category_key(&envelope, &public_key_hex(&owner.public_key()), &recipient).unwrap();

    let blob = seal(&category_key, b"dosage: 20mg daily").unwrap();
    assert_eq!(open(&unwrapped, &blob).unwrap(), b"dosage: 20mg daily");
}

#[tokio::test]
async fn test_fallback_reaches_third_endpoint() {
    // Endpoints [A(fails), B(fails), C(succeeds)]: the call returns C's
    // result, C is hit exactly once, and no fourth attempt happens.
    let (good, hits) = spawn_rpc_server(format!("0x{}", "00".repeat(32))).await;
    let mux = RpcMultiplexer::new(&ledger_config(vec![
        "http://127.0.0.1:18545".to_string(),
        "http://127.0.0.1:18546".to_string(),
        good,
    ]))
    .unwrap();

    let result = mux
        .call("0xdeadbeef", CONTRACT.parse().unwrap(), None)
        .await
        .unwrap();
    assert_eq!(result, format!("0x{}", "00".repeat(32)));
    assert_eq!(hits.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_exhausted_fallback_reports_last_endpoint_error() {
    // Endpoints fail in different ways: the first at transport level, the
    // second with HTTP 500. The terminal error must carry the failure of
    // the endpoint tried last, not the first one.
    let (failing, hits) = spawn_http_error_server(500).await;
    let mux = RpcMultiplexer::new(&ledger_config(vec![
        "http://127.0.0.1:18545".to_string(),
        failing,
    ]))
    .unwrap();

    let err = mux
        .call("0xdeadbeef", CONTRACT.parse().unwrap(), None)
        .await
        .unwrap_err();
    match err {
        VaultError::AllEndpointsUnavailable { last } => {
            assert!(last.contains("HTTP 500"), "unexpected last error: {last}");
        }
        other => panic!("expected AllEndpointsUnavailable, got {other}"),
    }
    assert_eq!(hits.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_read_decodes_manual_tuple_over_the_wire() {
    // A personal-info struct: tuple offset 32, four body slots, two
    // dynamic strings at relative offsets 128 and 192.
    let mut buf = vec![0u8; 32 + 192 + 64];
    write_slot(&mut buf, 0, 32);
    buf[32 + 12..64].copy_from_slice(&[0xaa; 20]); // owner
    write_slot(&mut buf, 64, 128); // full-name hash offset, relative
    write_slot(&mut buf, 96, 192); // demographics hash offset, relative
    write_slot(&mut buf, 128, 1_700_000_000); // updated_at
    write_str(&mut buf, 32 + 128, "QmFullNameHash01");
    write_str(&mut buf, 32 + 192, "QmDemo");

    let (endpoint, _) = spawn_rpc_server(format!("0x{}", alloy::hex::encode(&buf))).await;
    let provider = Arc::new(ScriptedProvider::new(None));
    let vault = HealthVault::new(&ledger_config(vec![endpoint]), provider).unwrap();

    let record = vault
        .personal_info(Address::repeat_byte(0xaa))
        .await
        .unwrap()
        .expect("record present");
    assert_eq!(record.owner, Address::repeat_byte(0xaa));
    assert_eq!(record.full_name_hash, "QmFullNameHash01");
    assert_eq!(record.demographics_hash, "QmDemo");
    assert_eq!(record.updated_at, 1_700_000_000);
}

#[tokio::test]
async fn test_read_share_record_with_unknown_ordinals() {
    // Status ordinal 9 comes from a newer contract; decode falls back to
    // the explicit unknown member instead of failing.
    let wrapped = "QUFBQQ=="; // envelope text is opaque at this layer
    let mut buf = vec![0u8; 32 + 192 + 64];
    write_slot(&mut buf, 0, 32);
    buf[32 + 12..64].copy_from_slice(&[0xbb; 20]); // recipient
    write_slot(&mut buf, 64, 3); // category: MedicalReports
    write_slot(&mut buf, 96, 1); // access: Manage
    write_slot(&mut buf, 128, 9); // status: unknown ordinal
    write_slot(&mut buf, 160, 1_800_000_000); // expires_at
    write_slot(&mut buf, 192, 192); // wrapped-key offset, relative
    write_str(&mut buf, 32 + 192, wrapped);

    let (endpoint, _) = spawn_rpc_server(format!("0x{}", alloy::hex::encode(&buf))).await;
    let provider = Arc::new(ScriptedProvider::new(None));
    let vault = HealthVault::new(&ledger_config(vec![endpoint]), provider).unwrap();

    let record = vault
        .share_record(
            Address::repeat_byte(0xaa),
            Address::repeat_byte(0xbb),
            Category::MedicalReports,
        )
        .await
        .unwrap()
        .expect("share present");
    assert_eq!(record.category, Category::MedicalReports);
    assert_eq!(record.access, AccessLevel::Manage);
    assert_eq!(record.status, ShareStatus::Unknown(9));
    assert_eq!(record.expires_at, 1_800_000_000);
    assert_eq!(record.wrapped_key, wrapped);
}

#[tokio::test]
async fn test_absent_record_is_none_not_error() {
    let (endpoint, _) = spawn_rpc_server("0x".to_string()).await;
    let provider = Arc::new(ScriptedProvider::new(None));
    let vault = HealthVault::new(&ledger_config(vec![endpoint]), provider).unwrap();
    let record = vault
        .medication_record(Address::repeat_byte(0xaa), 7)
        .await
        .unwrap();
    assert!(record.is_none());
}

#[tokio::test]
async fn test_write_path_submits_for_signature() {
    let provider = Arc::new(ScriptedProvider::new(Some(ProviderResponse::Approved {
        tx_hash: "0xfeed".to_string(),
    })));
    let vault = HealthVault::new(
        &ledger_config(vec!["http://127.0.0.1:18545".to_string()]),
        provider.clone(),
    )
    .unwrap();

    let outcome = vault
        .grant_share(
            Address::repeat_byte(0xbb),
            Category::VaccinationRecords,
            AccessLevel::View,
            1_800_000_000,
            "QUFBQQ==",
        )
        .await
        .unwrap();
    assert_eq!(
        outcome,
        SubmitOutcome::PendingApproval {
            tx_hash: "0xfeed".to_string()
        }
    );

    let params = provider.last_params.lock().unwrap().clone().unwrap();
    let object = &params[0];
    assert_eq!(object["to"], CONTRACT.parse::<Address>().unwrap().to_string());
    assert!(object["data"].as_str().unwrap().starts_with("0x"));
    assert_eq!(object["value"], "0x0");
}

#[tokio::test(start_paused = true)]
async fn test_timeout_then_late_response_is_discarded() {
    // Explicit nonce 0x5; the provider never answers within the deadline.
    // The submit fails with Timeout, and a response arriving afterwards
    // lands on a dead channel: no Accepted/Rejected transition can be
    // observed post-terminal.
    let provider = Arc::new(ScriptedProvider::new(None));
    let dispatcher = TxDispatcher::new(
        provider.clone(),
        &ledger_config(vec!["http://127.0.0.1:18545".to_string()]),
    );

    let err = dispatcher
        .submit(
            None,
            CONTRACT.parse().unwrap(),
            "0x01".to_string(),
            U256::ZERO,
            Some(5),
        )
        .await
        .unwrap_err();
    assert!(matches!(err, VaultError::Timeout(1)));
    assert_eq!(provider.requests.load(Ordering::SeqCst), 1);
    let params = provider.last_params.lock().unwrap().clone().unwrap();
    assert_eq!(params[0]["nonce"], "0x5");

    let late = provider.take_held().expect("provider held the channel");
    assert!(late
        .send(ProviderResponse::Approved {
            tx_hash: "0xlate".to_string()
        })
        .is_err());
}
