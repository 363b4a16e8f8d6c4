use super::Algo;
use crate::checks;
use crate::model::{Assignments, LabId, ProjectId, StudentId};
use crate::scoring::{PairScore, ScoreParams, score_pair};
use eyre::{Result, bail};
use rand::Rng;
use rand::rngs::StdRng;
use tracing::trace;

/// Heuristic strategy: within each lab, repeatedly commit the best-scoring
/// (unassigned student, under-capacity project) pair until everyone is
/// placed. Ties on the total score fall back to the higher preference
/// component, and remaining ties to an unbiased coin flip.
pub struct Greedy<'a> {
    assignments: &'a mut Assignments,
    params: ScoreParams,
    rng: StdRng,
}

impl<'a> Greedy<'a> {
    pub fn new(assignments: &'a mut Assignments, params: ScoreParams, rng: StdRng) -> Greedy<'a> {
        Greedy {
            assignments,
            params,
            rng,
        }
    }

    fn best_pair(
        &mut self,
        students: &[StudentId],
        projects: &[ProjectId],
    ) -> Option<(StudentId, ProjectId, PairScore)> {
        let mut best: Option<(StudentId, ProjectId, PairScore)> = None;
        for &student in students {
            for &project in projects {
                if self.assignments.is_full(project) {
                    continue;
                }
                let score = score_pair(self.assignments, &self.params, student, project);
                best = match best {
                    None => Some((student, project, score)),
                    Some((_, _, top))
                        if score.total() > top.total()
                            || (score.total() == top.total()
                                && (score.preference > top.preference
                                    || (score.preference == top.preference
                                        && self.rng.random_bool(0.5)))) =>
                    {
                        Some((student, project, score))
                    }
                    Some(_) => best,
                };
            }
        }
        best
    }

    fn assign_lab(&mut self, lab: LabId) -> Result<()> {
        let projects = self.assignments.projects_in_lab(lab);
        loop {
            let students = self.assignments.unassigned_students_in_lab(lab);
            if students.is_empty() {
                return Ok(());
            }
            let Some((student, project, score)) = self.best_pair(&students, &projects) else {
                bail!(
                    "lab {} has no open project left for {} unassigned students",
                    self.assignments.lab(lab).code,
                    students.len()
                );
            };
            trace!(
                "assigning {} to {} (preference {}, skill {:.2})",
                self.assignments.student(student).name,
                self.assignments.project(project).name,
                score.preference,
                score.skill
            );
            self.assignments.assign_to(student, project);
        }
    }
}

impl Algo for Greedy<'_> {
    fn assign(&mut self) -> Result<()> {
        // No assignment is committed unless every lab can seat its students.
        checks::ensure_capacity(self.assignments)?;
        for lab in 0..self.assignments.labs.len() {
            self.assign_lab(LabId(lab))?;
        }
        Ok(())
    }

    fn get_assignments(&self) -> &Assignments {
        self.assignments
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Project, Student};
    use rand::SeedableRng;

    const PARAMS: ScoreParams = ScoreParams {
        pref_scalar: 20,
        proficiency_threshold: 5,
    };

    fn student(id: usize, ratings: Vec<u32>, prefs: Vec<u32>) -> Student {
        Student {
            id: StudentId(id),
            name: format!("s{id}"),
            email: format!("s{id}@example.com"),
            lab: "02L".into(),
            ratings,
            preferences: prefs,
        }
    }

    // One lab, two projects of capacity two. P0 requires A, P1 requires B.
    fn fixture() -> Assignments {
        let students = vec![
            student(0, vec![8, 0], vec![5, 1]),
            student(1, vec![0, 8], vec![1, 5]),
            student(2, vec![7, 0], vec![3, 3]),
            student(3, vec![0, 0], vec![2, 2]),
        ];
        let projects = vec![
            Project::new(ProjectId(0), "P0".into(), vec![true, false]),
            Project::new(ProjectId(1), "P1".into(), vec![false, true]),
        ];
        let mut a = Assignments::new(students, projects, vec!["A".into(), "B".into()]).unwrap();
        a.set_project_lab(ProjectId(0), LabId(0));
        a.set_project_lab(ProjectId(1), LabId(0));
        a.set_capacity(ProjectId(0), 2);
        a.set_capacity(ProjectId(1), 2);
        a
    }

    #[test]
    fn everyone_is_placed_and_capacities_are_exact() {
        let mut a = fixture();
        let mut greedy = Greedy::new(&mut a, PARAMS, StdRng::seed_from_u64(7));
        greedy.assign().unwrap();
        assert!(a.unassigned_students().is_empty());
        for p in a.all_projects() {
            assert_eq!(a.size(p), a.capacity(p));
        }
    }

    #[test]
    fn preferences_steer_the_first_commits() {
        let mut a = fixture();
        let mut greedy = Greedy::new(&mut a, PARAMS, StdRng::seed_from_u64(7));
        greedy.assign().unwrap();
        // Students 0 and 1 score highest on their preferred projects and are
        // committed before anyone else can take those seats.
        assert_eq!(a.project_for(StudentId(0)), Some(ProjectId(0)));
        assert_eq!(a.project_for(StudentId(1)), Some(ProjectId(1)));
    }

    #[test]
    fn runs_are_deterministic_under_a_seed() {
        let run = |seed| {
            let mut a = fixture();
            let mut greedy = Greedy::new(&mut a, PARAMS, StdRng::seed_from_u64(seed));
            greedy.assign().unwrap();
            a.all_students()
                .into_iter()
                .map(|s| a.project_for(s))
                .collect::<Vec<_>>()
        };
        assert_eq!(run(3), run(3));
        assert_eq!(run(99), run(99));
    }

    #[test]
    fn capacity_shortfall_aborts_before_any_commit() {
        let mut a = fixture();
        a.set_capacity(ProjectId(1), 1);
        let mut greedy = Greedy::new(&mut a, PARAMS, StdRng::seed_from_u64(7));
        assert!(greedy.assign().is_err());
        assert_eq!(a.unassigned_students().len(), 4);
    }
}
