use crate::model::{Assignments, LabId, ProjectId};
use eyre::{Result, ensure};
use rand::Rng;
use rand::rngs::StdRng;
use tracing::{debug, info};

/// Give every project to exactly one lab.
///
/// Labs are walked in a fixed cyclic order; the current lab keeps popping its
/// most-preferred remaining project until it has received its quota of teams.
/// A popped project with no owner is claimed outright; a popped project that
/// already belongs to another lab is displaced only if the current lab's fit
/// is strictly better, or on a coin flip when the fits tie. Pops are
/// destructive, so every lab grows pickier as the walk goes on.
pub fn allocate(a: &mut Assignments, quotas: &[usize], rng: &mut StdRng) -> Result<()> {
    let total: usize = quotas.iter().sum();
    ensure!(
        total == a.projects.len(),
        "lab quotas cover {} teams for {} projects",
        total,
        a.projects.len()
    );

    let preferences = lab_preferences(a);
    let fits = project_fits(a);

    // Per-lab preference rankings, most preferred first; a cursor per lab
    // stands in for the destructive pop.
    let rankings: Vec<Vec<ProjectId>> = preferences
        .iter()
        .map(|prefs| {
            let mut order = a.all_projects();
            order.sort_by(|&ProjectId(x), &ProjectId(y)| prefs[y].total_cmp(&prefs[x]));
            order
        })
        .collect();
    let mut cursors = vec![0usize; a.labs.len()];
    let mut counts = vec![0usize; a.labs.len()];
    let mut remaining = a.projects.len();

    let mut lab_idx = 0;
    while remaining > 0 {
        if counts[lab_idx] == quotas[lab_idx] || cursors[lab_idx] == rankings[lab_idx].len() {
            lab_idx = (lab_idx + 1) % a.labs.len();
            continue;
        }
        let lab = LabId(lab_idx);
        let project = rankings[lab_idx][cursors[lab_idx]];
        cursors[lab_idx] += 1;
        match a.project_lab(project) {
            None => {
                debug!(
                    "assigning project {} to lab {}",
                    a.project(project).name,
                    a.lab(lab).code
                );
                a.set_project_lab(project, lab);
                counts[lab_idx] += 1;
                remaining -= 1;
            }
            Some(current) if current != lab => {
                let current_fit = fits[project.0][current.0];
                let new_fit = fits[project.0][lab_idx];
                if new_fit > current_fit || (new_fit == current_fit && rng.random_bool(0.5)) {
                    debug!(
                        "moving project {} from lab {} to lab {} (fit {:.3} -> {:.3})",
                        a.project(project).name,
                        a.lab(current).code,
                        a.lab(lab).code,
                        current_fit,
                        new_fit
                    );
                    counts[current.0] -= 1;
                    a.set_project_lab(project, lab);
                    counts[lab_idx] += 1;
                }
            }
            Some(_) => {}
        }
    }

    info!("all {} projects allocated to labs", a.projects.len());
    Ok(())
}

/// Average preference of each lab's students for every project, indexed by
/// lab then project.
fn lab_preferences(a: &Assignments) -> Vec<Vec<f64>> {
    a.labs
        .iter()
        .map(|lab| {
            let students = a.students_in_lab(lab.id);
            a.all_projects()
                .into_iter()
                .map(|p| {
                    let sum: u32 = students.iter().map(|&s| a.student(s).preference(p)).sum();
                    f64::from(sum) / students.len() as f64
                })
                .collect()
        })
        .collect()
}

/// Fit of each project for every lab: the lab's mean student rating summed
/// over the project's required skills, averaged over the skill universe. The
/// denominator is the same for every lab, so displacement comparisons only
/// see the required-skill strength.
fn project_fits(a: &Assignments) -> Vec<Vec<f64>> {
    let lab_means: Vec<Vec<f64>> = a
        .labs
        .iter()
        .map(|lab| {
            let students = a.students_in_lab(lab.id);
            a.all_skills()
                .into_iter()
                .map(|k| {
                    let sum: u32 = students.iter().map(|&s| a.student(s).rating(k)).sum();
                    f64::from(sum) / students.len() as f64
                })
                .collect()
        })
        .collect();
    a.projects
        .iter()
        .map(|project| {
            lab_means
                .iter()
                .map(|means| {
                    let sum: f64 = project.required_skills().map(|k| means[k.0]).sum();
                    sum / a.skills.len() as f64
                })
                .collect()
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Project, Student, StudentId};
    use rand::SeedableRng;

    fn student(id: usize, lab: &str, ratings: Vec<u32>, prefs: Vec<u32>) -> Student {
        Student {
            id: StudentId(id),
            name: format!("s{id}"),
            email: format!("s{id}@example.com"),
            lab: lab.to_owned(),
            ratings,
            preferences: prefs,
        }
    }

    // Two labs, two projects. Both labs prefer P0, but lab 03L is much
    // stronger in P0's required skill.
    fn fixture() -> Assignments {
        let students = vec![
            student(0, "02L", vec![1, 8], vec![5, 2]),
            student(1, "02L", vec![1, 6], vec![4, 1]),
            student(2, "03L", vec![8, 1], vec![5, 1]),
            student(3, "03L", vec![6, 1], vec![4, 2]),
        ];
        let projects = vec![
            Project::new(ProjectId(0), "P0".into(), vec![true, false]),
            Project::new(ProjectId(1), "P1".into(), vec![false, true]),
        ];
        Assignments::new(students, projects, vec!["A".into(), "B".into()]).unwrap()
    }

    #[test]
    fn every_project_gets_a_lab_within_quota() {
        let mut a = fixture();
        let mut rng = StdRng::seed_from_u64(1);
        allocate(&mut a, &[1, 1], &mut rng).unwrap();
        assert!(a.all_projects().iter().all(|&p| a.project_lab(p).is_some()));
        assert_eq!(a.projects_in_lab(LabId(0)).len(), 1);
        assert_eq!(a.projects_in_lab(LabId(1)).len(), 1);
    }

    #[test]
    fn better_fitting_lab_displaces_the_first_claimant() {
        let mut a = fixture();
        let mut rng = StdRng::seed_from_u64(1);
        allocate(&mut a, &[1, 1], &mut rng).unwrap();
        // Lab 02L claims P0 first (walk order), but 03L's fit for skill A
        // (7.0 vs 1.0) takes it over; 02L falls back to P1.
        assert_eq!(a.project_lab(ProjectId(0)), Some(LabId(1)));
        assert_eq!(a.project_lab(ProjectId(1)), Some(LabId(0)));
    }

    #[test]
    fn quota_mismatch_is_rejected() {
        let mut a = fixture();
        let mut rng = StdRng::seed_from_u64(1);
        assert!(allocate(&mut a, &[1, 2], &mut rng).is_err());
    }

    #[test]
    fn allocation_is_deterministic_under_a_seed() {
        let run = |seed| {
            let mut a = fixture();
            let mut rng = StdRng::seed_from_u64(seed);
            allocate(&mut a, &[1, 1], &mut rng).unwrap();
            a.all_projects()
                .into_iter()
                .map(|p| a.project_lab(p))
                .collect::<Vec<_>>()
        };
        assert_eq!(run(42), run(42));
    }
}
