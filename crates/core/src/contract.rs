//! Contract entry points.
//!
//! The hosting environment invokes the ledger by function name with positional string
//! arguments. [`Chaincode::invoke`] resolves the name, checks the argument count, runs the
//! operation inside a fresh [`Invocation`] and commits the write set only if the operation
//! succeeded.
//!
//! | Function              | Arguments                                 | Payload          |
//! |-----------------------|-------------------------------------------|------------------|
//! | `InitLedgerEHR`       | -                                         | -                |
//! | `InitLedgerPayment`   | -                                         | -                |
//! | `AddPatient`          | `id, name, dob`                           | -                |
//! | `AddMedicalRecord`    | `patientId, diagnosis, treatment`         | -                |
//! | `CreatePayment`       | `id, amount, patientId, providerId`       | -                |
//! | `UpdatePaymentStatus` | `id, newStatus`                           | -                |
//! | `PatientExists`       | `id`                                      | `true`/`false`   |
//! | `GetPatient`          | `id`                                      | patient document |
//! | `GetPayment`          | `id`                                      | payment document |

use crate::config::CoreConfig;
use crate::error::{LedgerError, LedgerResult};
use crate::invocation::{Invocation, TransactionContext};
use crate::repositories::patients::PatientService;
use crate::repositories::payments::PaymentService;
use crate::seed;
use crate::world_state::WorldState;
use rust_decimal::Decimal;
use serde_json::Value;
use std::str::FromStr;
use std::sync::Arc;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ContractFunction {
    InitLedgerEhr,
    InitLedgerPayment,
    AddPatient,
    AddMedicalRecord,
    CreatePayment,
    UpdatePaymentStatus,
    PatientExists,
    GetPatient,
    GetPayment,
}

impl ContractFunction {
    pub const ALL: [ContractFunction; 9] = [
        ContractFunction::InitLedgerEhr,
        ContractFunction::InitLedgerPayment,
        ContractFunction::AddPatient,
        ContractFunction::AddMedicalRecord,
        ContractFunction::CreatePayment,
        ContractFunction::UpdatePaymentStatus,
        ContractFunction::PatientExists,
        ContractFunction::GetPatient,
        ContractFunction::GetPayment,
    ];

    pub fn name(self) -> &'static str {
        match self {
            ContractFunction::InitLedgerEhr => "InitLedgerEHR",
            ContractFunction::InitLedgerPayment => "InitLedgerPayment",
            ContractFunction::AddPatient => "AddPatient",
            ContractFunction::AddMedicalRecord => "AddMedicalRecord",
            ContractFunction::CreatePayment => "CreatePayment",
            ContractFunction::UpdatePaymentStatus => "UpdatePaymentStatus",
            ContractFunction::PatientExists => "PatientExists",
            ContractFunction::GetPatient => "GetPatient",
            ContractFunction::GetPayment => "GetPayment",
        }
    }

    pub fn arity(self) -> usize {
        match self {
            ContractFunction::InitLedgerEhr | ContractFunction::InitLedgerPayment => 0,
            ContractFunction::PatientExists
            | ContractFunction::GetPatient
            | ContractFunction::GetPayment => 1,
            ContractFunction::UpdatePaymentStatus => 2,
            ContractFunction::AddPatient | ContractFunction::AddMedicalRecord => 3,
            ContractFunction::CreatePayment => 4,
        }
    }
}

impl FromStr for ContractFunction {
    type Err = LedgerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ContractFunction::ALL
            .into_iter()
            .find(|f| f.name() == s)
            .ok_or_else(|| LedgerError::UnknownFunction(s.to_string()))
    }
}

impl std::fmt::Display for ContractFunction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// The deployed contract: patient and payment operations behind named entry points.
#[derive(Clone, Debug)]
pub struct Chaincode {
    patients: PatientService,
    payments: PaymentService,
}

impl Chaincode {
    pub fn new(cfg: Arc<CoreConfig>) -> Self {
        Self {
            patients: PatientService::new(),
            payments: PaymentService::new(cfg),
        }
    }

    /// Runs `function` as one transaction against `world`.
    ///
    /// `identity` is the caller identity asserted by the hosting environment, if any.
    /// Nothing is written to `world` unless the whole operation succeeds.
    pub fn invoke<W>(
        &self,
        world: &mut W,
        identity: Option<String>,
        function: &str,
        args: &[String],
    ) -> LedgerResult<Option<Value>>
    where
        W: WorldState + ?Sized,
    {
        let mut invocation = Invocation::new(world, identity);
        let payload = self.dispatch(&mut invocation, function, args)?;
        tracing::debug!(
            "{} staged {} write(s)",
            function,
            invocation.pending_writes()
        );
        invocation.commit()?;
        Ok(payload)
    }

    /// Resolves and runs `function` against an existing transaction context.
    pub fn dispatch<C>(&self, ctx: &mut C, function: &str, args: &[String]) -> LedgerResult<Option<Value>>
    where
        C: TransactionContext + ?Sized,
    {
        let function = function.parse::<ContractFunction>()?;
        if args.len() != function.arity() {
            return Err(LedgerError::InvalidArguments(format!(
                "{} expects {} argument(s), got {}",
                function,
                function.arity(),
                args.len()
            )));
        }
        tracing::debug!("dispatching {} with {} argument(s)", function, args.len());

        match function {
            ContractFunction::InitLedgerEhr => {
                seed::init_ledger_ehr(ctx)?;
                Ok(None)
            }
            ContractFunction::InitLedgerPayment => {
                seed::init_ledger_payment(&self.payments, ctx)?;
                Ok(None)
            }
            ContractFunction::AddPatient => {
                self.patients.create(ctx, &args[0], &args[1], &args[2])?;
                Ok(None)
            }
            ContractFunction::AddMedicalRecord => {
                self.patients
                    .add_medical_record(ctx, &args[0], &args[1], &args[2])?;
                Ok(None)
            }
            ContractFunction::CreatePayment => {
                let amount = parse_amount(&args[1])?;
                self.payments
                    .create(ctx, &args[0], amount, &args[2], &args[3])?;
                Ok(None)
            }
            ContractFunction::UpdatePaymentStatus => {
                self.payments.update_status(ctx, &args[0], &args[1])?;
                Ok(None)
            }
            ContractFunction::PatientExists => {
                let exists = self.patients.exists(ctx, &args[0])?;
                Ok(Some(Value::Bool(exists)))
            }
            ContractFunction::GetPatient => {
                let patient = self.patients.fetch(ctx, &args[0])?;
                to_payload(&patient).map(Some)
            }
            ContractFunction::GetPayment => {
                let payment = self.payments.fetch(ctx, &args[0])?;
                to_payload(&payment).map(Some)
            }
        }
    }
}

fn parse_amount(raw: &str) -> LedgerResult<Decimal> {
    let trimmed = raw.trim();
    Decimal::from_str(trimmed)
        .or_else(|_| Decimal::from_scientific(trimmed))
        .map_err(|_| LedgerError::InvalidArguments(format!("amount '{raw}' is not a number")))
}

fn to_payload<T: serde::Serialize>(document: &T) -> LedgerResult<Value> {
    serde_json::to_value(document).map_err(LedgerError::Encode)
}
