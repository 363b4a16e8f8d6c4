use crate::model::{Project, ProjectId, Student};
use eyre::{Result, bail};
use tracing::debug;

/// Offer each listed project twice. The existing entry is renamed to
/// `<base>1` and a clone named `<base>2` is appended; every student's
/// preference entry for the base name is carried over to both. Applying the
/// transform a second time with the same list is an error, not a silent
/// re-duplication.
pub fn apply(
    students: &mut Vec<Student>,
    projects: &mut Vec<Project>,
    duplicates: &[String],
) -> Result<()> {
    for base in duplicates {
        let Some(idx) = projects.iter().position(|p| &p.name == base) else {
            if projects
                .iter()
                .any(|p| &p.original_name == base && p.name != p.original_name)
            {
                bail!("project {base} has already been duplicated");
            }
            bail!("cannot duplicate unknown project {base}");
        };
        let mut twin = projects[idx].clone();
        twin.id = ProjectId(projects.len());
        twin.name = format!("{base}2");
        projects[idx].name = format!("{base}1");
        debug!(
            "duplicating project {base} into {} and {}",
            projects[idx].name, twin.name
        );
        projects.push(twin);
        for student in students.iter_mut() {
            let preference = student.preferences[idx];
            student.preferences.push(preference);
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::StudentId;

    fn fixture() -> (Vec<Student>, Vec<Project>) {
        let students = vec![Student {
            id: StudentId(0),
            name: "s0".into(),
            email: "s0@example.com".into(),
            lab: "02L".into(),
            ratings: vec![0],
            preferences: vec![4, 2],
        }];
        let projects = vec![
            Project::new(ProjectId(0), "X10eML".into(), vec![false]),
            Project::new(ProjectId(1), "SOE".into(), vec![true]),
        ];
        (students, projects)
    }

    #[test]
    fn duplication_renames_and_copies_preferences() {
        let (mut students, mut projects) = fixture();
        apply(&mut students, &mut projects, &["X10eML".into()]).unwrap();
        assert_eq!(projects.len(), 3);
        assert_eq!(projects[0].name, "X10eML1");
        assert_eq!(projects[0].original_name, "X10eML");
        assert_eq!(projects[2].name, "X10eML2");
        assert_eq!(projects[2].original_name, "X10eML");
        assert_eq!(projects[2].id, ProjectId(2));
        assert_eq!(students[0].preferences, vec![4, 2, 4]);
    }

    #[test]
    fn duplicating_twice_is_rejected() {
        let (mut students, mut projects) = fixture();
        let list = vec!["X10eML".to_owned()];
        apply(&mut students, &mut projects, &list).unwrap();
        let err = apply(&mut students, &mut projects, &list).unwrap_err();
        assert!(err.to_string().contains("already been duplicated"));
    }

    #[test]
    fn duplicating_unknown_project_is_rejected() {
        let (mut students, mut projects) = fixture();
        assert!(apply(&mut students, &mut projects, &["NOPE".into()]).is_err());
    }
}
