use anyhow::Context;
use clap::{Parser, Subcommand};
use ehr_ledger_core::constants::{
    DEFAULT_LEDGER_PATH, IDENTITY_ENV, LEDGER_PATH_ENV, PAYMENT_KEYS_ENV,
};
use ehr_ledger_core::{
    payment_key_layout_from_env_value, Chaincode, ContractFunction, CoreConfig, FileWorldState,
};
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Parser)]
#[command(name = "ehr-ledger")]
#[command(about = "Invoke the EHR and payment contract against a file-backed ledger")]
struct Cli {
    /// World state file
    #[arg(long, global = true, env = LEDGER_PATH_ENV, default_value = DEFAULT_LEDGER_PATH)]
    ledger: PathBuf,

    /// Caller identity asserted for this invocation
    #[arg(long, global = true, env = IDENTITY_ENV)]
    identity: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Seed the two demo patients
    InitEhr,
    /// Seed the two demo payments
    InitPayments,
    /// Register a new patient
    AddPatient {
        /// Patient id (ledger key)
        id: String,
        /// Full name
        name: String,
        /// Date of birth
        dob: String,
    },
    /// Append a medical record as the calling identity
    AddRecord {
        patient_id: String,
        diagnosis: String,
        treatment: String,
    },
    /// Create a PENDING payment, replacing any payment with the same id
    CreatePayment {
        id: String,
        #[arg(allow_hyphen_values = true)]
        amount: String,
        patient_id: String,
        provider_id: String,
    },
    /// Move a payment to PAID or DENIED
    UpdatePaymentStatus {
        id: String,
        /// PAID or DENIED
        status: String,
    },
    /// Check whether a patient exists
    PatientExists { id: String },
    /// Print a patient document
    GetPatient { id: String },
    /// Print a payment document
    GetPayment { id: String },
    /// Invoke a contract function by name
    Invoke {
        /// Function name, e.g. AddPatient
        function: String,
        /// Positional arguments
        #[arg(allow_hyphen_values = true)]
        args: Vec<String>,
    },
    /// List contract functions
    Functions,
}

impl Commands {
    /// The contract function and arguments this command maps to, or `None` for local commands.
    fn into_call(self) -> Option<(String, Vec<String>)> {
        let call = |f: ContractFunction, args: Vec<String>| Some((f.name().to_string(), args));
        match self {
            Commands::InitEhr => call(ContractFunction::InitLedgerEhr, vec![]),
            Commands::InitPayments => call(ContractFunction::InitLedgerPayment, vec![]),
            Commands::AddPatient { id, name, dob } => {
                call(ContractFunction::AddPatient, vec![id, name, dob])
            }
            Commands::AddRecord {
                patient_id,
                diagnosis,
                treatment,
            } => call(
                ContractFunction::AddMedicalRecord,
                vec![patient_id, diagnosis, treatment],
            ),
            Commands::CreatePayment {
                id,
                amount,
                patient_id,
                provider_id,
            } => call(
                ContractFunction::CreatePayment,
                vec![id, amount, patient_id, provider_id],
            ),
            Commands::UpdatePaymentStatus { id, status } => {
                call(ContractFunction::UpdatePaymentStatus, vec![id, status])
            }
            Commands::PatientExists { id } => call(ContractFunction::PatientExists, vec![id]),
            Commands::GetPatient { id } => call(ContractFunction::GetPatient, vec![id]),
            Commands::GetPayment { id } => call(ContractFunction::GetPayment, vec![id]),
            Commands::Invoke { function, args } => Some((function, args)),
            Commands::Functions => None,
        }
    }
}

fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("ehr_ledger_core=info")),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    let Some(command) = cli.command else {
        println!("Use 'ehr-ledger --help' for commands");
        return Ok(());
    };
    let Some((function, args)) = command.into_call() else {
        for function in ContractFunction::ALL {
            println!("{} ({} args)", function, function.arity());
        }
        return Ok(());
    };

    let layout = payment_key_layout_from_env_value(std::env::var(PAYMENT_KEYS_ENV).ok())?;
    let chaincode = Chaincode::new(Arc::new(CoreConfig::new(layout)));
    tracing::debug!("payment key layout: {}", layout);

    let mut world = FileWorldState::open(&cli.ledger)
        .with_context(|| format!("failed to open ledger {}", cli.ledger.display()))?;

    let payload = chaincode
        .invoke(&mut world, cli.identity, &function, &args)
        .with_context(|| format!("{function} failed"))?;

    match payload {
        Some(value) => println!("{}", serde_json::to_string_pretty(&value)?),
        None => println!("{function}: ok"),
    }

    Ok(())
}
