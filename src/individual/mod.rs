//! Individual input records and CSV loading

mod data;
pub mod loader;

pub use data::{HandicapTrack, IncapacityType, IndividualInput, WorkplaceIncapacity, YearlySalary};
pub use loader::{
    load_individuals, load_individuals_from_reader, load_salary_history,
    load_salary_history_from_reader, IndividualRecord, DEFAULT_INDIVIDUALS_PATH,
};
