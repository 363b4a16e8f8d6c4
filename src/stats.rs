use crate::model::{Assignments, ProjectId};

/// Distribution of the preference ratings students ended up with, indexed by
/// rating value.
pub fn preference_distribution(a: &Assignments) -> Vec<usize> {
    let mut granted = Vec::new();
    for s in a.all_students() {
        if let Some(p) = a.project_for(s) {
            let rating = a.student(s).preference(p) as usize;
            if granted.len() <= rating {
                granted.resize(rating + 1, 0);
            }
            granted[rating] += 1;
        }
    }
    granted
}

/// Mean preference rating of a project's assigned members.
pub fn average_assigned_preference(a: &Assignments, project: ProjectId) -> f64 {
    let members = a.students_for(project);
    if members.is_empty() {
        return 0.0;
    }
    let sum: u32 = members
        .iter()
        .map(|&s| a.student(s).preference(project))
        .sum();
    f64::from(sum) / members.len() as f64
}

/// Percentage of a project's required skills held, at or above the coverage
/// threshold, by at least one assigned member. A project without required
/// skills is vacuously covered.
pub fn fulfilled_skills_percent(a: &Assignments, project: ProjectId, threshold: u32) -> u32 {
    let p = a.project(project);
    let required = p.required_count();
    if required == 0 {
        return 100;
    }
    let fulfilled = p
        .required_skills()
        .filter(|&k| {
            a.students_for(project)
                .iter()
                .any(|&s| a.student(s).rating(k) >= threshold)
        })
        .count();
    (100 * fulfilled / required) as u32
}

/// Classwide percentage of students holding each skill at or above the
/// coverage threshold, indexed by `SkillId`.
pub fn skill_frequency(a: &Assignments, threshold: u32) -> Vec<f64> {
    a.all_skills()
        .into_iter()
        .map(|k| {
            let holders = a
                .all_students()
                .into_iter()
                .filter(|&s| a.student(s).rating(k) >= threshold)
                .count();
            100.0 * holders as f64 / a.students.len() as f64
        })
        .collect()
}

/// Baseline a team's coverage can be compared against: the mean classwide
/// frequency of the project's required skills.
pub fn expected_coverage(a: &Assignments, project: ProjectId, frequency: &[f64]) -> f64 {
    let p = a.project(project);
    let required = p.required_count();
    if required == 0 {
        return 100.0;
    }
    p.required_skills().map(|k| frequency[k.0]).sum::<f64>() / required as f64
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{LabId, Project, Student, StudentId};

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

    fn fixture() -> Assignments {
        let students = vec![
            student(0, vec![8, 0], vec![5, 1]),
            student(1, vec![0, 3], vec![4, 2]),
        ];
        let projects = vec![
            Project::new(ProjectId(0), "P0".into(), vec![true, true]),
            Project::new(ProjectId(1), "P1".into(), vec![false, false]),
        ];
        let mut a = Assignments::new(students, projects, vec!["A".into(), "B".into()]).unwrap();
        a.set_project_lab(ProjectId(0), LabId(0));
        a.set_project_lab(ProjectId(1), LabId(0));
        a.set_capacity(ProjectId(0), 2);
        a.assign_to(StudentId(0), ProjectId(0));
        a.assign_to(StudentId(1), ProjectId(0));
        a
    }

    #[test]
    fn distribution_counts_granted_ratings() {
        let a = fixture();
        assert_eq!(preference_distribution(&a), vec![0, 0, 0, 0, 1, 1]);
    }

    #[test]
    fn average_preference_is_the_member_mean() {
        let a = fixture();
        assert_eq!(average_assigned_preference(&a, ProjectId(0)), 4.5);
        assert_eq!(average_assigned_preference(&a, ProjectId(1)), 0.0);
    }

    #[test]
    fn coverage_counts_only_threshold_ratings() {
        let a = fixture();
        // A is covered by student 0 (8 >= 6); B's best rating is 3.
        assert_eq!(fulfilled_skills_percent(&a, ProjectId(0), 6), 50);
        assert_eq!(fulfilled_skills_percent(&a, ProjectId(1), 6), 100);
    }

    #[test]
    fn frequency_and_expected_coverage() {
        let a = fixture();
        let frequency = skill_frequency(&a, 6);
        assert_eq!(frequency, vec![50.0, 0.0]);
        assert_eq!(expected_coverage(&a, ProjectId(0), &frequency), 25.0);
        assert_eq!(expected_coverage(&a, ProjectId(1), &frequency), 100.0);
    }
}
