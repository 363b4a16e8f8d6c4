pub use self::assignments::Assignments;
pub use self::lab::{Lab, LabId};
pub use self::project::{Project, ProjectId};
pub use self::student::{Student, StudentId};

mod assignments;
mod lab;
mod project;
mod student;

/// Index into the skill universe shared by all students and projects.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct SkillId(pub usize);
