//! Load individuals and salary histories from CSV

use super::{HandicapTrack, IncapacityType, IndividualInput, WorkplaceIncapacity, YearlySalary};
use crate::error::{EstimatorError, Result};
use crate::rules::parse_birth_date;
use csv::Reader;
use std::path::Path;

/// Default location of the sample batch
pub const DEFAULT_INDIVIDUALS_PATH: &str = "data/sample_individuals.csv";

/// An input tagged with the identifier it was loaded under
#[derive(Debug, Clone, PartialEq)]
pub struct IndividualRecord {
    pub person_id: String,
    pub input: IndividualInput,
}

/// Raw CSV row matching the batch input columns
#[derive(Debug, serde::Deserialize)]
struct CsvRow {
    #[serde(rename = "PersonID")]
    person_id: String,
    #[serde(rename = "BirthDate", default)]
    birth_date: Option<String>,
    #[serde(rename = "TargetAge")]
    target_age: f64,
    #[serde(rename = "Quarters")]
    quarters: i32,
    #[serde(rename = "Points", default)]
    points: Option<f64>,
    #[serde(rename = "AverageSalary", default)]
    average_salary: Option<f64>,
    #[serde(rename = "Children", default)]
    children: Option<u32>,
    #[serde(rename = "AVA", default)]
    ava: Option<i32>,
    #[serde(rename = "AVPF", default)]
    avpf: Option<i32>,
    #[serde(rename = "C2PPoints", default)]
    c2p_points: Option<f64>,
    #[serde(rename = "IncapacityPct", default)]
    incapacity_pct: Option<f64>,
    #[serde(rename = "IncapacityType", default)]
    incapacity_type: Option<String>,
    #[serde(rename = "ATControlOK", default)]
    at_control_ok: Option<bool>,
    #[serde(rename = "Exposure17Years", default)]
    exposure_17_years: Option<bool>,
    #[serde(rename = "MedicalOpinion", default)]
    medical_opinion: Option<bool>,
    #[serde(rename = "CommissionOK", default)]
    commission_ok: Option<bool>,
    #[serde(rename = "Handicap", default)]
    handicap: Option<bool>,
    #[serde(rename = "HandicapQuarters", default)]
    handicap_quarters: Option<i32>,
    #[serde(rename = "LongCareer", default)]
    long_career: Option<bool>,
    #[serde(rename = "Disability", default)]
    disability: Option<bool>,
}

impl CsvRow {
    fn to_record(self, row: usize) -> Result<IndividualRecord> {
        let type_code = self.incapacity_type.unwrap_or_default();
        let kind = IncapacityType::from_code(&type_code).ok_or_else(|| EstimatorError::InvalidFormat {
            row,
            message: format!("Unknown IncapacityType: {}", type_code),
        })?;

        let input = IndividualInput {
            birth_date: self.birth_date.as_deref().and_then(parse_birth_date),
            target_age: self.target_age,
            base_quarters: self.quarters,
            points: self.points.unwrap_or(0.0),
            average_salary: self.average_salary,
            salary_history: Vec::new(),
            children: self.children.unwrap_or(0),
            ava_quarters: self.ava.unwrap_or(0),
            avpf_quarters: self.avpf.unwrap_or(0),
            hardship_points: self.c2p_points.unwrap_or(0.0),
            incapacity: WorkplaceIncapacity {
                percent: self.incapacity_pct.unwrap_or(0.0),
                kind,
                work_accident_control_ok: self.at_control_ok.unwrap_or(false),
                exposure_17_years: self.exposure_17_years.unwrap_or(false),
                medical_commission_opinion: self.medical_opinion.unwrap_or(false),
                commission_approval: self.commission_ok.unwrap_or(false),
            },
            handicap: HandicapTrack {
                active: self.handicap.unwrap_or(false),
                contributed_quarters: self.handicap_quarters.unwrap_or(0),
            },
            long_career: self.long_career.unwrap_or(false),
            disability: self.disability.unwrap_or(false),
        };

        Ok(IndividualRecord {
            person_id: self.person_id,
            input,
        })
    }
}

/// Load all individuals from a CSV file
pub fn load_individuals<P: AsRef<Path>>(path: P) -> Result<Vec<IndividualRecord>> {
    let reader = Reader::from_path(path)?;
    read_individuals(reader)
}

/// Load individuals from any reader (e.g., string buffer, stdin)
pub fn load_individuals_from_reader<R: std::io::Read>(reader: R) -> Result<Vec<IndividualRecord>> {
    read_individuals(Reader::from_reader(reader))
}

fn read_individuals<R: std::io::Read>(mut reader: Reader<R>) -> Result<Vec<IndividualRecord>> {
    let mut records = Vec::new();

    for (idx, result) in reader.deserialize().enumerate() {
        let row: CsvRow = result?;
        // Header is line 1
        records.push(row.to_record(idx + 2)?);
    }

    Ok(records)
}

/// Raw salary history row
#[derive(Debug, serde::Deserialize)]
struct SalaryRow {
    #[serde(rename = "Year")]
    _year: i32,
    #[serde(rename = "Salary")]
    salary: f64,
    #[serde(rename = "Coefficient", default)]
    coefficient: Option<f64>,
}

/// Load a yearly salary history (Year, Salary, Coefficient)
pub fn load_salary_history<P: AsRef<Path>>(path: P) -> Result<Vec<YearlySalary>> {
    let reader = Reader::from_path(path)?;
    read_salary_history(reader)
}

/// Load a yearly salary history from any reader
pub fn load_salary_history_from_reader<R: std::io::Read>(reader: R) -> Result<Vec<YearlySalary>> {
    read_salary_history(Reader::from_reader(reader))
}

fn read_salary_history<R: std::io::Read>(mut reader: Reader<R>) -> Result<Vec<YearlySalary>> {
    let mut history = Vec::new();

    for result in reader.deserialize() {
        let row: SalaryRow = result?;
        history.push(YearlySalary {
            salary: row.salary,
            revaluation: row.coefficient,
        });
    }

    Ok(history)
}
