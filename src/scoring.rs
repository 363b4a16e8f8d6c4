use crate::model::{Assignments, ProjectId, SkillId, StudentId};

#[derive(Clone, Copy, Debug)]
pub struct ScoreParams {
    /// Multiplier applied to the raw preference rating.
    pub pref_scalar: u32,
    /// A required skill counts as fulfilled once an assigned member rates it
    /// strictly above this.
    pub proficiency_threshold: u32,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PairScore {
    pub preference: f64,
    pub skill: f64,
}

impl PairScore {
    pub fn total(self) -> f64 {
        self.preference + self.skill
    }
}

/// Score a (student, project) pair. The skill component uses dynamic
/// weights: with `S` required skills of which `U` are still unfulfilled by
/// the project's current members, every unfulfilled skill weighs `S / U` and
/// everything else weighs 1. This must be recomputed at the moment of
/// scoring, since each committed assignment can fulfill skills and thereby
/// shift the weights toward the project's rarest remaining gaps.
pub fn score_pair(
    a: &Assignments,
    params: &ScoreParams,
    student: StudentId,
    project: ProjectId,
) -> PairScore {
    let p = a.project(project);
    let members = a.students_for(project);
    let mut unfulfilled = Vec::new();
    let mut required_total = 0usize;
    for skill in p.required_skills() {
        required_total += 1;
        if members
            .iter()
            .all(|&m| a.student(m).rating(skill) <= params.proficiency_threshold)
        {
            unfulfilled.push(skill);
        }
    }
    let mut weights = vec![1.0f64; a.skills.len()];
    if !unfulfilled.is_empty() {
        let weight = required_total as f64 / unfulfilled.len() as f64;
        for SkillId(skill) in unfulfilled {
            weights[skill] = weight;
        }
    }

    let s = a.student(student);
    let preference = f64::from(params.pref_scalar * s.preference(project));
    let mut skill = 0.0;
    for (idx, weight) in weights.iter().enumerate() {
        let rating = s.rating(SkillId(idx));
        if rating != 0 && p.requires(SkillId(idx)) {
            skill += f64::from(rating) * weight;
        }
    }
    PairScore { preference, skill }
}
