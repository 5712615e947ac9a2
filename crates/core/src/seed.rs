//! Initial ledger population.
//!
//! Seeding writes a fixed set of patients and payments without checking what is already
//! stored. Running it against a populated ledger overwrites those records, so it belongs
//! at deployment time only.

use crate::error::LedgerResult;
use crate::invocation::TransactionContext;
use crate::records::{Patient, Payment};
use crate::repositories::payments::PaymentService;
use crate::storage::{patient_key, write_document};
use rust_decimal::Decimal;

/// `(id, name, dob)` of each seeded patient.
const SEED_PATIENTS: [(&str, &str, &str); 2] = [
    ("patient1", "John Doe", "1990-01-01"),
    ("patient2", "Jane Smith", "1985-05-15"),
];

/// `(id, amount in whole units, patient, provider)` of each seeded payment.
const SEED_PAYMENTS: [(&str, i64, &str, &str); 2] = [
    ("payment1", 100, "patient1", "provider1"),
    ("payment2", 150, "patient2", "provider2"),
];

/// Writes the seed patients with empty histories.
pub fn init_ledger_ehr<C>(ctx: &mut C) -> LedgerResult<()>
where
    C: TransactionContext + ?Sized,
{
    for (id, name, dob) in SEED_PATIENTS {
        let patient = Patient::new(id, name, dob);
        write_document(ctx, &patient_key(id), &patient)?;
    }
    tracing::info!("seeded {} patients", SEED_PATIENTS.len());
    Ok(())
}

/// Writes the seed payments as `PENDING`, dated at the transaction timestamp.
pub fn init_ledger_payment<C>(payments: &PaymentService, ctx: &mut C) -> LedgerResult<()>
where
    C: TransactionContext + ?Sized,
{
    let service_date = ctx.tx_timestamp();
    for (id, amount, patient_id, provider_id) in SEED_PAYMENTS {
        let payment = Payment::new(id, Decimal::from(amount), patient_id, provider_id, service_date);
        payments.store(ctx, &payment)?;
    }
    tracing::info!("seeded {} payments", SEED_PAYMENTS.len());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{CoreConfig, PaymentKeyLayout};
    use crate::invocation::Invocation;
    use crate::records::PaymentStatus;
    use crate::repositories::patients::PatientService;
    use crate::world_state::{MemoryWorldState, WorldState};
    use rust_decimal_macros::dec;
    use std::sync::Arc;

    fn payments(layout: PaymentKeyLayout) -> PaymentService {
        PaymentService::new(Arc::new(CoreConfig::new(layout)))
    }

    #[test]
    fn test_init_ledger_ehr_seeds_two_patients() {
        let mut world = MemoryWorldState::new();
        let mut inv = Invocation::new(&mut world, None);
        init_ledger_ehr(&mut inv).unwrap();
        inv.commit().unwrap();

        let inv = Invocation::new(&mut world, None);
        let patient = PatientService::new().fetch(&inv, "patient1").unwrap();
        assert_eq!(
            serde_json::to_value(&patient).unwrap(),
            serde_json::json!({
                "id": "patient1",
                "name": "John Doe",
                "dob": "1990-01-01",
                "history": [],
                "accessLog": [],
            })
        );

        let jane = PatientService::new().fetch(&inv, "patient2").unwrap();
        assert_eq!(jane.name, "Jane Smith");
        assert_eq!(jane.dob, "1985-05-15");
    }

    #[test]
    fn test_init_ledger_ehr_overwrites_existing_patient() {
        let mut world = MemoryWorldState::new();
        let mut inv = Invocation::new(&mut world, None);
        let mut patient = Patient::new("patient1", "Changed", "2001-01-01");
        patient.append_entry(
            crate::records::Record {
                date: inv.tx_timestamp(),
                diagnosis: "x".into(),
                doctor_id: "d".into(),
                treatment: "y".into(),
            },
            crate::records::Access {
                entity_id: "d".into(),
                purpose: "Record addition".into(),
                timestamp: inv.tx_timestamp(),
            },
        );
        write_document(&mut inv, "patient1", &patient).unwrap();
        inv.commit().unwrap();

        let mut inv = Invocation::new(&mut world, None);
        init_ledger_ehr(&mut inv).unwrap();
        inv.commit().unwrap();

        let inv = Invocation::new(&mut world, None);
        let reseeded = PatientService::new().fetch(&inv, "patient1").unwrap();
        assert_eq!(reseeded.name, "John Doe");
        assert!(reseeded.medical_history().is_empty());
    }

    #[test]
    fn test_init_ledger_payment_writes_bare_keys_under_legacy_layout() {
        let mut world = MemoryWorldState::new();
        let service = payments(PaymentKeyLayout::Legacy);
        let mut inv = Invocation::new(&mut world, None);
        init_ledger_payment(&service, &mut inv).unwrap();
        inv.commit().unwrap();

        let keys: Vec<&str> = world.keys().collect();
        assert_eq!(keys, vec!["payment1", "payment2"]);

        let raw = world.get_state("payment2").unwrap().unwrap();
        let payment: Payment = serde_json::from_slice(&raw).unwrap();
        assert_eq!(payment.amount, dec!(150));
        assert_eq!(payment.patient_id, "patient2");
        assert_eq!(payment.provider_id, "provider2");
        assert_eq!(payment.status, PaymentStatus::Pending);
    }

    #[test]
    fn test_init_ledger_payment_is_fetchable_under_prefixed_layout() {
        let mut world = MemoryWorldState::new();
        let service = payments(PaymentKeyLayout::Prefixed);
        let mut inv = Invocation::new(&mut world, None);
        init_ledger_payment(&service, &mut inv).unwrap();
        inv.commit().unwrap();

        let inv = Invocation::new(&mut world, None);
        let payment = service.fetch(&inv, "payment1").unwrap();
        assert_eq!(payment.amount, dec!(100));
    }
}
