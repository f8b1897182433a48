//! Semantic operations against the health-record contract.
//!
//! One descriptor per contract function, used symmetrically for encoding
//! the call and decoding its result. Reads go through the multiplexer with
//! the caller identity always threaded through when a session exists;
//! writes go through the dispatcher, exactly one signing exchange each.
//! Absence (the `0x` sentinel or a zeroed struct) is a valid read outcome,
//! returned as `None`/zero, never as an error.

use std::sync::Arc;

use alloy::primitives::{Address, U256};

use crate::abi::decode::{decode_outputs, TupleDecoder};
use crate::abi::encode::encode_hex;
use crate::abi::token::{Function, ParamType, Token};
use crate::config::schema::LedgerConfig;
use crate::error::{VaultError, VaultResult};
use crate::records::types::{
    AccessLevel, Category, MedicalReport, MedicationRecord, PersonalInfoRecord, ShareRecord,
    ShareStatus, VaccinationRecord,
};
use crate::rpc::multiplexer::RpcMultiplexer;
use crate::tx::dispatcher::{SubmitOutcome, TxDispatcher};
use crate::tx::provider::SigningProvider;

const FN_GET_PERSONAL_INFO: Function = Function {
    name: "getPersonalInfo",
    inputs: &[ParamType::Address],
    outputs: &[], // struct return, manual tuple decode
};

const FN_SET_PERSONAL_INFO: Function = Function {
    name: "setPersonalInfo",
    inputs: &[ParamType::Str, ParamType::Str],
    outputs: &[],
};

const FN_GET_MEDICATION_RECORD: Function = Function {
    name: "getMedicationRecord",
    inputs: &[ParamType::Address, ParamType::Uint(256)],
    outputs: &[], // struct return, manual tuple decode
};

const FN_GET_MEDICATION_COUNT: Function = Function {
    name: "getMedicationCount",
    inputs: &[ParamType::Address],
    outputs: &[ParamType::Uint(256)],
};

const FN_ADD_MEDICATION_RECORD: Function = Function {
    name: "addMedicationRecord",
    inputs: &[ParamType::Str, ParamType::Str],
    outputs: &[],
};

const FN_GET_VACCINATION_RECORD: Function = Function {
    name: "getVaccinationRecord",
    inputs: &[ParamType::Address, ParamType::Uint(256)],
    outputs: &[], // struct return, manual tuple decode
};

const FN_GET_VACCINATION_COUNT: Function = Function {
    name: "getVaccinationCount",
    inputs: &[ParamType::Address],
    outputs: &[ParamType::Uint(256)],
};

const FN_ADD_VACCINATION_RECORD: Function = Function {
    name: "addVaccinationRecord",
    inputs: &[ParamType::Str, ParamType::Uint(256)],
    outputs: &[],
};

const FN_GET_MEDICAL_REPORT: Function = Function {
    name: "getMedicalReport",
    inputs: &[ParamType::Address, ParamType::Uint(256)],
    outputs: &[], // struct return, manual tuple decode
};

const FN_GET_REPORT_COUNT: Function = Function {
    name: "getReportCount",
    inputs: &[ParamType::Address],
    outputs: &[ParamType::Uint(256)],
};

const FN_ADD_MEDICAL_REPORT: Function = Function {
    name: "addMedicalReport",
    inputs: &[ParamType::Str, ParamType::Str],
    outputs: &[],
};

const FN_GET_SHARE_RECORD: Function = Function {
    name: "getShareRecord",
    inputs: &[ParamType::Address, ParamType::Address, ParamType::Uint(8)],
    outputs: &[], // struct return, manual tuple decode
};

const FN_GRANT_SHARE: Function = Function {
    name: "grantShare",
    inputs: &[
        ParamType::Address,
        ParamType::Uint(8),
        ParamType::Uint(8),
        ParamType::Uint(256),
        ParamType::Str,
    ],
    outputs: &[],
};

const FN_REVOKE_SHARE: Function = Function {
    name: "revokeShare",
    inputs: &[ParamType::Address, ParamType::Uint(8)],
    outputs: &[],
};

/// Client facade for the health-record contract.
pub struct HealthVault {
    rpc: RpcMultiplexer,
    dispatcher: TxDispatcher,
    provider: Arc<dyn SigningProvider>,
    contract: Address,
}

impl HealthVault {
    pub fn new(config: &LedgerConfig, provider: Arc<dyn SigningProvider>) -> VaultResult<Self> {
        let contract: Address = config
            .contract_address
            .parse()
            .map_err(|e| VaultError::InvalidAddress(format!("contract address: {e}")))?;
        Ok(Self {
            rpc: RpcMultiplexer::new(config)?,
            dispatcher: TxDispatcher::new(provider.clone(), config),
            provider,
            contract,
        })
    }

    /// Identity threaded through every read as the RPC `from` field.
    fn caller(&self) -> Option<Address> {
        self.provider.current_identity()
    }

    async fn read(&self, function: &Function, tokens: &[Token]) -> VaultResult<String> {
        let data = encode_hex(function, tokens)?;
        self.rpc.call(&data, self.contract, self.caller()).await
    }

    /// Struct reads share one absence rule: the `0x` sentinel or a decoder
    /// that cannot even anchor a body means "no record".
    async fn read_tuple(
        &self,
        function: &Function,
        tokens: &[Token],
    ) -> VaultResult<Option<TupleDecoder>> {
        let raw = self.read(function, tokens).await?;
        match TupleDecoder::new(&raw) {
            Ok(decoder) => Ok(Some(decoder)),
            Err(VaultError::EmptyResponse) => Ok(None),
            Err(e) => Err(e),
        }
    }

    async fn read_count(&self, function: &Function, owner: Address) -> VaultResult<u64> {
        let raw = self.read(function, &[Token::Address(owner)]).await?;
        match decode_outputs(function.outputs, &raw) {
            Ok(tokens) => match tokens.first() {
                Some(Token::Uint(value, _)) => u64::try_from(*value)
                    .map_err(|_| VaultError::Codec("count does not fit u64".to_string())),
                _ => Err(VaultError::Codec("expected uint result".to_string())),
            },
            // No entries yet: absence is a valid outcome.
            Err(VaultError::EmptyResponse) => Ok(0),
            Err(e) => Err(e),
        }
    }

    // --- reads ---

    pub async fn personal_info(&self, owner: Address) -> VaultResult<Option<PersonalInfoRecord>> {
        let decoder = match self
            .read_tuple(&FN_GET_PERSONAL_INFO, &[Token::Address(owner)])
            .await?
        {
            Some(d) => d,
            None => return Ok(None),
        };
        let record = PersonalInfoRecord {
            owner: decoder.field_address(0)?,
            full_name_hash: decoder.field_str(1)?,
            demographics_hash: decoder.field_str(2)?,
            updated_at: decoder.field_u64(3)?,
        };
        if record.owner == Address::ZERO {
            return Ok(None);
        }
        Ok(Some(record))
    }

    pub async fn medication_record(
        &self,
        owner: Address,
        id: u64,
    ) -> VaultResult<Option<MedicationRecord>> {
        let decoder = match self
            .read_tuple(
                &FN_GET_MEDICATION_RECORD,
                &[Token::Address(owner), Token::Uint(U256::from(id), 256)],
            )
            .await?
        {
            Some(d) => d,
            None => return Ok(None),
        };
        let record = MedicationRecord {
            id: decoder.field_u64(0)?,
            owner: decoder.field_address(1)?,
            content_hash: decoder.field_str(2)?,
            prescriber: decoder.field_str(3)?,
            added_at: decoder.field_u64(4)?,
        };
        if record.owner == Address::ZERO {
            return Ok(None);
        }
        Ok(Some(record))
    }

    pub async fn medication_count(&self, owner: Address) -> VaultResult<u64> {
        self.read_count(&FN_GET_MEDICATION_COUNT, owner).await
    }

    pub async fn vaccination_record(
        &self,
        owner: Address,
        id: u64,
    ) -> VaultResult<Option<VaccinationRecord>> {
        let decoder = match self
            .read_tuple(
                &FN_GET_VACCINATION_RECORD,
                &[Token::Address(owner), Token::Uint(U256::from(id), 256)],
            )
            .await?
        {
            Some(d) => d,
            None => return Ok(None),
        };
        let record = VaccinationRecord {
            id: decoder.field_u64(0)?,
            owner: decoder.field_address(1)?,
            content_hash: decoder.field_str(2)?,
            administered_at: decoder.field_u64(3)?,
        };
        if record.owner == Address::ZERO {
            return Ok(None);
        }
        Ok(Some(record))
    }

    pub async fn vaccination_count(&self, owner: Address) -> VaultResult<u64> {
        self.read_count(&FN_GET_VACCINATION_COUNT, owner).await
    }

    pub async fn medical_report(
        &self,
        owner: Address,
        id: u64,
    ) -> VaultResult<Option<MedicalReport>> {
        let decoder = match self
            .read_tuple(
                &FN_GET_MEDICAL_REPORT,
                &[Token::Address(owner), Token::Uint(U256::from(id), 256)],
            )
            .await?
        {
            Some(d) => d,
            None => return Ok(None),
        };
        let record = MedicalReport {
            id: decoder.field_u64(0)?,
            owner: decoder.field_address(1)?,
            content_hash: decoder.field_str(2)?,
            report_type: decoder.field_str(3)?,
            created_at: decoder.field_u64(4)?,
        };
        if record.owner == Address::ZERO {
            return Ok(None);
        }
        Ok(Some(record))
    }

    pub async fn report_count(&self, owner: Address) -> VaultResult<u64> {
        self.read_count(&FN_GET_REPORT_COUNT, owner).await
    }

    pub async fn share_record(
        &self,
        owner: Address,
        recipient: Address,
        category: Category,
    ) -> VaultResult<Option<ShareRecord>> {
        let decoder = match self
            .read_tuple(
                &FN_GET_SHARE_RECORD,
                &[
                    Token::Address(owner),
                    Token::Address(recipient),
                    Token::Uint(U256::from(category.ordinal()), 8),
                ],
            )
            .await?
        {
            Some(d) => d,
            None => return Ok(None),
        };
        let record = ShareRecord {
            recipient: decoder.field_address(0)?,
            category: Category::from_ordinal(decoder.field_ordinal(1)?),
            access: AccessLevel::from_ordinal(decoder.field_ordinal(2)?),
            status: ShareStatus::from_ordinal(decoder.field_ordinal(3)?),
            expires_at: decoder.field_u64(4)?,
            wrapped_key: decoder.field_str(5)?,
        };
        if record.recipient == Address::ZERO {
            return Ok(None);
        }
        Ok(Some(record))
    }

    // --- writes ---

    async fn write(&self, function: &Function, tokens: &[Token]) -> VaultResult<SubmitOutcome> {
        let data = encode_hex(function, tokens)?;
        self.dispatcher
            .submit(None, self.contract, data, U256::ZERO, None)
            .await
    }

    pub async fn set_personal_info(
        &self,
        full_name_hash: &str,
        demographics_hash: &str,
    ) -> VaultResult<SubmitOutcome> {
        self.write(
            &FN_SET_PERSONAL_INFO,
            &[
                Token::Str(full_name_hash.to_string()),
                Token::Str(demographics_hash.to_string()),
            ],
        )
        .await
    }

    pub async fn add_medication_record(
        &self,
        content_hash: &str,
        prescriber: &str,
    ) -> VaultResult<SubmitOutcome> {
        self.write(
            &FN_ADD_MEDICATION_RECORD,
            &[
                Token::Str(content_hash.to_string()),
                Token::Str(prescriber.to_string()),
            ],
        )
        .await
    }

    pub async fn add_vaccination_record(
        &self,
        content_hash: &str,
        administered_at: u64,
    ) -> VaultResult<SubmitOutcome> {
        self.write(
            &FN_ADD_VACCINATION_RECORD,
            &[
                Token::Str(content_hash.to_string()),
                Token::Uint(U256::from(administered_at), 256),
            ],
        )
        .await
    }

    pub async fn add_medical_report(
        &self,
        content_hash: &str,
        report_type: &str,
    ) -> VaultResult<SubmitOutcome> {
        self.write(
            &FN_ADD_MEDICAL_REPORT,
            &[
                Token::Str(content_hash.to_string()),
                Token::Str(report_type.to_string()),
            ],
        )
        .await
    }

    pub async fn grant_share(
        &self,
        recipient: Address,
        category: Category,
        access: AccessLevel,
        expires_at: u64,
        wrapped_key: &str,
    ) -> VaultResult<SubmitOutcome> {
        self.write(
            &FN_GRANT_SHARE,
            &[
                Token::Address(recipient),
                Token::Uint(U256::from(category.ordinal()), 8),
                Token::Uint(U256::from(access.ordinal()), 8),
                Token::Uint(U256::from(expires_at), 256),
                Token::Str(wrapped_key.to_string()),
            ],
        )
        .await
    }

    pub async fn revoke_share(
        &self,
        recipient: Address,
        category: Category,
    ) -> VaultResult<SubmitOutcome> {
        self.write(
            &FN_REVOKE_SHARE,
            &[
                Token::Address(recipient),
                Token::Uint(U256::from(category.ordinal()), 8),
            ],
        )
        .await
    }
}
