pub mod dates;
pub mod paging;
pub mod reporting;
pub mod student;
