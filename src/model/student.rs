use super::{ProjectId, SkillId};

#[derive(Clone, Copy, Debug, Eq, Ord, PartialEq, PartialOrd)]
pub struct StudentId(pub usize);

#[derive(Clone, Debug)]
pub struct Student {
    pub id: StudentId,
    pub name: String,
    pub email: String,
    /// Lab section code, e.g. "02L".
    pub lab: String,
    /// Self-rated skill levels indexed by `SkillId`, 0 meaning no skill.
    pub ratings: Vec<u32>,
    /// Preference rating for every project, indexed by `ProjectId`.
    pub preferences: Vec<u32>,
}

impl Student {
    pub fn rating(&self, SkillId(skill): SkillId) -> u32 {
        self.ratings[skill]
    }

    pub fn preference(&self, ProjectId(project): ProjectId) -> u32 {
        self.preferences[project]
    }
}
