use clap::{Parser, Subcommand};
use pms_core::{
    CoreConfig, JsonFileStore, NewPatient, Patch, PatientService, PatientUpdate, PatientView,
    DEFAULT_PATIENT_DATA_FILE,
};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "pms")]
#[command(about = "Patients Management System CLI")]
struct Cli {
    /// JSON file holding all patients
    #[arg(long, env = "PATIENT_DATA_FILE", default_value = DEFAULT_PATIENT_DATA_FILE)]
    data_file: PathBuf,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// List all patients
    List,
    /// Show one patient
    Show {
        /// Patient id
        id: String,
    },
    /// List patients sorted by height, weight or bmi
    Sort {
        /// Field to sort on: height, weight or bmi
        sort_by: String,
        /// Sort order: asc or desc
        #[arg(long, default_value = "asc")]
        order: String,
    },
    /// Create a patient
    Create {
        /// Patient id
        id: String,
        /// Full name
        name: String,
        /// City
        city: String,
        /// Age in years
        age: i64,
        /// Male, Female or Others
        gender: String,
        /// Height in centimeters
        height: f64,
        /// Weight in kilograms
        weight: f64,
    },
    /// Update some fields of a patient
    Edit {
        /// Patient id
        id: String,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        city: Option<String>,
        #[arg(long)]
        age: Option<i64>,
        #[arg(long)]
        gender: Option<String>,
        /// Height in centimeters
        #[arg(long)]
        height: Option<f64>,
        /// Weight in kilograms
        #[arg(long)]
        weight: Option<f64>,
    },
    /// Delete a patient
    Delete {
        /// Patient id
        id: String,
    },
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let Some(command) = cli.command else {
        println!("Use 'pms --help' for commands");
        return Ok(());
    };

    let cfg = CoreConfig::new(cli.data_file)?;
    let service = PatientService::new(JsonFileStore::new(cfg.patient_data_file()));

    match command {
        Commands::List => print_patients(&service.list_all()?),
        Commands::Show { id } => match service.get_by_id(&id) {
            Ok(patient) => println!("{}", format_patient(&patient)),
            Err(e) => eprintln!("Error showing patient: {}", e),
        },
        Commands::Sort { sort_by, order } => match service.sort_by(&sort_by, &order) {
            Ok(patients) => print_patients(&patients),
            Err(e) => eprintln!("Error sorting patients: {}", e),
        },
        Commands::Create {
            id,
            name,
            city,
            age,
            gender,
            height,
            weight,
        } => {
            let new_patient = NewPatient {
                id: id.clone(),
                name,
                city,
                age,
                gender,
                height,
                weight,
            };
            match service.create(new_patient) {
                Ok(()) => println!("Created patient {}", id),
                Err(e) => eprintln!("Error creating patient: {}", e),
            }
        }
        Commands::Edit {
            id,
            name,
            city,
            age,
            gender,
            height,
            weight,
        } => {
            let update = PatientUpdate {
                name: Patch::from(name),
                city: Patch::from(city),
                age: Patch::from(age),
                gender: Patch::from(gender),
                height: Patch::from(height),
                weight: Patch::from(weight),
            };
            if update.is_empty() {
                eprintln!("Nothing to update: pass at least one field");
                return Ok(());
            }
            match service.update(&id, update) {
                Ok(()) => println!("Updated patient {}", id),
                Err(e) => eprintln!("Error updating patient: {}", e),
            }
        }
        Commands::Delete { id } => match service.delete(&id) {
            Ok(()) => println!("Deleted patient {}", id),
            Err(e) => eprintln!("Error deleting patient: {}", e),
        },
    }

    Ok(())
}

fn print_patients(patients: &[PatientView]) {
    if patients.is_empty() {
        println!("No patients found.");
    } else {
        for patient in patients {
            println!("{}", format_patient(patient));
        }
    }
}

fn format_patient(p: &PatientView) -> String {
    format!(
        "ID: {}, Name: {}, City: {}, Age: {}, Gender: {}, Height: {} cm, Weight: {} kg, BMI: {:.2} ({})",
        p.id, p.name, p.city, p.age, p.gender, p.height, p.weight, p.bmi, p.verdict
    )
}
