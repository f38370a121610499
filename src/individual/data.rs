//! Individual career data supplied by the caller for one calculation

use crate::rules::parse_birth_date;
use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};

/// Origin of a permanent workplace incapacity (IPP)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum IncapacityType {
    #[default]
    None,
    /// Maladie professionnelle
    OccupationalDisease,
    /// Accident du travail
    WorkAccident,
}

impl IncapacityType {
    /// Parse the codes used in input files (English or French labels)
    pub fn from_code(code: &str) -> Option<Self> {
        match code.trim().to_ascii_uppercase().as_str() {
            "" | "NONE" | "AUCUN" => Some(IncapacityType::None),
            "OCCUPATIONAL_DISEASE" | "MALADIE_PRO" => Some(IncapacityType::OccupationalDisease),
            "WORK_ACCIDENT" | "AT" => Some(IncapacityType::WorkAccident),
            _ => None,
        }
    }
}

/// Permanent workplace incapacity and its supporting attestations
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorkplaceIncapacity {
    /// Incapacity rate in percent (20.0 = 20%)
    pub percent: f64,

    pub kind: IncapacityType,

    /// Work-accident incapacity recognised after control
    pub work_accident_control_ok: bool,

    /// 17 years of exposure to occupational risk factors (10-19% band)
    pub exposure_17_years: bool,

    /// Favourable opinion of the regional medical commission (10-19% band)
    pub medical_commission_opinion: bool,

    /// Approval of the pluridisciplinary commission (10-19% band)
    pub commission_approval: bool,
}

impl WorkplaceIncapacity {
    pub fn new(percent: f64, kind: IncapacityType) -> Self {
        Self {
            percent,
            kind,
            ..Self::default()
        }
    }

    /// ≥ 20% from an occupational disease, or from a controlled work accident
    pub fn qualifies_major(&self) -> bool {
        self.percent >= 20.0
            && match self.kind {
                IncapacityType::OccupationalDisease => true,
                IncapacityType::WorkAccident => self.work_accident_control_ok,
                IncapacityType::None => false,
            }
    }

    /// 10-19% with all three supporting conditions
    pub fn qualifies_minor(&self) -> bool {
        (10.0..20.0).contains(&self.percent)
            && self.exposure_17_years
            && self.medical_commission_opinion
            && self.commission_approval
    }
}

/// Handicap (RATH) track selection
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HandicapTrack {
    pub active: bool,

    /// Quarters contributed while handicapped
    pub contributed_quarters: i32,
}

/// One year of earnings with its revaluation coefficient
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct YearlySalary {
    pub salary: f64,

    /// Revaluation coefficient (1.0 when absent)
    #[serde(default)]
    pub revaluation: Option<f64>,
}

impl YearlySalary {
    pub fn new(salary: f64) -> Self {
        Self { salary, revaluation: None }
    }

    pub fn revalued(salary: f64, coefficient: f64) -> Self {
        Self { salary, revaluation: Some(coefficient) }
    }

    /// Salary expressed in current money
    pub fn revalued_amount(&self) -> f64 {
        self.salary * self.revaluation.unwrap_or(1.0)
    }
}

/// Career data for one pension estimate
///
/// Built once per request and never mutated by the calculator. The caller is
/// responsible for range checks; the calculator clamps negative counts to zero.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndividualInput {
    /// Date of birth; None keeps the baseline rules
    #[serde(default, deserialize_with = "lenient_birth_date")]
    pub birth_date: Option<NaiveDate>,

    /// Age at departure in decimal years
    pub target_age: f64,

    /// Validated base quarters (cotisés/validés, buy-backs included)
    #[serde(default)]
    pub base_quarters: i32,

    /// Complementary scheme points (Agirc-Arrco)
    #[serde(default)]
    pub points: f64,

    /// Average reference salary (SAM); derived from the history when absent
    #[serde(default)]
    pub average_salary: Option<f64>,

    /// Yearly earnings used to derive the SAM
    #[serde(default)]
    pub salary_history: Vec<YearlySalary>,

    #[serde(default)]
    pub children: u32,

    /// AVA caregiving quarters
    #[serde(default)]
    pub ava_quarters: i32,

    /// AVPF parental quarters
    #[serde(default)]
    pub avpf_quarters: i32,

    /// C2P hardship points
    #[serde(default)]
    pub hardship_points: f64,

    #[serde(default)]
    pub incapacity: WorkplaceIncapacity,

    #[serde(default)]
    pub handicap: HandicapTrack,

    #[serde(default)]
    pub long_career: bool,

    #[serde(default)]
    pub disability: bool,
}

/// Unparsable dates deserialize to None instead of failing the whole record
fn lenient_birth_date<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    Ok(raw.as_deref().and_then(parse_birth_date))
}

impl IndividualInput {
    /// Input with only a target age; every other figure is zero
    pub fn new(target_age: f64) -> Self {
        Self {
            birth_date: None,
            target_age,
            base_quarters: 0,
            points: 0.0,
            average_salary: None,
            salary_history: Vec::new(),
            children: 0,
            ava_quarters: 0,
            avpf_quarters: 0,
            hardship_points: 0.0,
            incapacity: WorkplaceIncapacity::default(),
            handicap: HandicapTrack::default(),
            long_career: false,
            disability: false,
        }
    }

    pub fn with_birth_date(mut self, birth_date: NaiveDate) -> Self {
        self.birth_date = Some(birth_date);
        self
    }

    /// Set the birth date from an ISO string; unparsable strings clear it
    pub fn with_birth_date_str(mut self, raw: &str) -> Self {
        self.birth_date = parse_birth_date(raw);
        self
    }

    pub fn with_quarters(mut self, quarters: i32) -> Self {
        self.base_quarters = quarters;
        self
    }

    pub fn with_points(mut self, points: f64) -> Self {
        self.points = points;
        self
    }

    pub fn with_average_salary(mut self, salary: f64) -> Self {
        self.average_salary = Some(salary);
        self
    }

    pub fn with_salary_history(mut self, history: Vec<YearlySalary>) -> Self {
        self.salary_history = history;
        self
    }

    pub fn with_children(mut self, children: u32) -> Self {
        self.children = children;
        self
    }

    pub fn with_caregiving(mut self, ava_quarters: i32, avpf_quarters: i32) -> Self {
        self.ava_quarters = ava_quarters;
        self.avpf_quarters = avpf_quarters;
        self
    }

    pub fn with_hardship_points(mut self, points: f64) -> Self {
        self.hardship_points = points;
        self
    }

    pub fn with_incapacity(mut self, incapacity: WorkplaceIncapacity) -> Self {
        self.incapacity = incapacity;
        self
    }

    /// Engage the handicap track with the quarters contributed while handicapped
    pub fn with_handicap(mut self, contributed_quarters: i32) -> Self {
        self.handicap = HandicapTrack {
            active: true,
            contributed_quarters,
        };
        self
    }

    pub fn with_long_career(mut self) -> Self {
        self.long_career = true;
        self
    }

    pub fn with_disability(mut self) -> Self {
        self.disability = true;
        self
    }
}
