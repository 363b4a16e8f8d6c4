use crate::model::{Project, ProjectId, Student, StudentId};
use eyre::{Result, WrapErr, bail};
use std::fs::{self, File};
use std::io::Read;
use std::path::Path;
use tracing::{trace, warn};

/// Load the three input files and return the raw entities. The skill
/// universe defines the order of every rating and required-skill vector,
/// and the project order defines the preference-vector order.
pub fn load(
    skills_path: &Path,
    projects_path: &Path,
    students_path: &Path,
) -> Result<(Vec<Student>, Vec<Project>, Vec<String>)> {
    let skills = load_skills(skills_path)
        .wrap_err_with(|| format!("cannot load skills from {}", skills_path.display()))?;
    let projects = parse_projects(
        File::open(projects_path)
            .wrap_err_with(|| format!("cannot open {}", projects_path.display()))?,
        &skills,
    )
    .wrap_err_with(|| format!("cannot load projects from {}", projects_path.display()))?;
    let students = parse_students(
        File::open(students_path)
            .wrap_err_with(|| format!("cannot open {}", students_path.display()))?,
        &skills,
        &projects,
    )
    .wrap_err_with(|| format!("cannot load students from {}", students_path.display()))?;
    trace!(
        "loaded {} students, {} projects, {} skills",
        students.len(),
        projects.len(),
        skills.len()
    );
    Ok((students, projects, skills))
}

/// One skill name per line, blank lines skipped.
fn load_skills(path: &Path) -> Result<Vec<String>> {
    let skills = fs::read_to_string(path)?
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_owned)
        .collect::<Vec<_>>();
    if skills.is_empty() {
        bail!("the skill universe is empty");
    }
    Ok(skills)
}

/// Projects table with a `name` column and a `skills` column holding a
/// comma-separated subset of the skill universe.
fn parse_projects<R: Read>(reader: R, skills: &[String]) -> Result<Vec<Project>> {
    let mut rdr = csv::Reader::from_reader(reader);
    let headers = rdr.headers()?.clone();
    let name_col = column(&headers, "name")?;
    let skills_col = column(&headers, "skills")?;
    let mut projects = Vec::new();
    for record in rdr.records() {
        let record = record?;
        let name = record[name_col].trim().to_owned();
        let mut required = vec![false; skills.len()];
        for skill in record[skills_col].split(',') {
            let skill = skill.trim();
            if skill.is_empty() {
                continue;
            }
            match skills.iter().position(|k| k == skill) {
                Some(idx) => required[idx] = true,
                None => bail!("project {name} requires unknown skill {skill}"),
            }
        }
        projects.push(Project::new(ProjectId(projects.len()), name, required));
    }
    Ok(projects)
}

/// Students table: `name`, `email` and `lab` columns, one rating column per
/// skill and one preference column per project. Extra columns are ignored
/// with a warning, missing ones are an error.
fn parse_students<R: Read>(
    reader: R,
    skills: &[String],
    projects: &[Project],
) -> Result<Vec<Student>> {
    let mut rdr = csv::Reader::from_reader(reader);
    let headers = rdr.headers()?.clone();
    let name_col = column(&headers, "name")?;
    let email_col = column(&headers, "email")?;
    let lab_col = column(&headers, "lab")?;
    let rating_cols = skills
        .iter()
        .map(|skill| column(&headers, skill))
        .collect::<Result<Vec<_>>>()?;
    let preference_cols = projects
        .iter()
        .map(|project| column(&headers, &project.name))
        .collect::<Result<Vec<_>>>()?;
    for (idx, header) in headers.iter().enumerate() {
        if ![name_col, email_col, lab_col].contains(&idx)
            && !rating_cols.contains(&idx)
            && !preference_cols.contains(&idx)
        {
            warn!("ignoring unknown student column {header}");
        }
    }
    let mut students = Vec::new();
    for record in rdr.records() {
        let record = record?;
        let name = record[name_col].trim().to_owned();
        let ratings = rating_cols
            .iter()
            .map(|&col| cell(&record, col, &name, "skill rating"))
            .collect::<Result<Vec<u32>>>()?;
        let preferences = preference_cols
            .iter()
            .map(|&col| cell(&record, col, &name, "preference"))
            .collect::<Result<Vec<u32>>>()?;
        students.push(Student {
            id: StudentId(students.len()),
            name,
            email: record[email_col].trim().to_owned(),
            lab: record[lab_col].trim().to_owned(),
            ratings,
            preferences,
        });
    }
    Ok(students)
}

fn column(headers: &csv::StringRecord, name: &str) -> Result<usize> {
    match headers.iter().position(|h| h.trim() == name) {
        Some(idx) => Ok(idx),
        None => bail!("missing column {name}"),
    }
}

fn cell(record: &csv::StringRecord, col: usize, student: &str, what: &str) -> Result<u32> {
    record[col]
        .trim()
        .parse()
        .wrap_err_with(|| format!("invalid {what} {:?} for student {student}", &record[col]))
}

#[cfg(test)]
mod tests {
    use super::*;

    const SKILLS: [&str; 3] = ["web dev", "ml", "databases"];

    fn skills() -> Vec<String> {
        SKILLS.iter().map(|&s| s.to_owned()).collect()
    }

    #[test]
    fn projects_resolve_their_required_skills() {
        let csv = "name,skills\nAtlas,\"web dev,databases\"\nBoreal,ml\n";
        let projects = parse_projects(csv.as_bytes(), &skills()).unwrap();
        assert_eq!(projects.len(), 2);
        assert_eq!(projects[0].name, "Atlas");
        assert_eq!(projects[0].required, vec![true, false, true]);
        assert_eq!(projects[1].required, vec![false, true, false]);
    }

    #[test]
    fn unknown_required_skill_is_rejected() {
        let csv = "name,skills\nAtlas,quantum\n";
        let err = parse_projects(csv.as_bytes(), &skills())
            .unwrap_err()
            .to_string();
        assert!(err.contains("unknown skill quantum"), "{err}");
    }

    #[test]
    fn students_pick_up_ratings_and_preferences_by_column_name() {
        let projects = parse_projects("name,skills\nAtlas,ml\nBoreal,\n".as_bytes(), &skills())
            .unwrap();
        // Columns deliberately out of universe order, plus an ignored extra.
        let csv = "name,email,lab,ml,web dev,databases,comment,Boreal,Atlas\n\
                   Ada,ada@example.com,02L,7,2,0,hi,3,5\n";
        let students = parse_students(csv.as_bytes(), &skills(), &projects).unwrap();
        assert_eq!(students.len(), 1);
        assert_eq!(students[0].lab, "02L");
        assert_eq!(students[0].ratings, vec![2, 7, 0]);
        assert_eq!(students[0].preferences, vec![5, 3]);
    }

    #[test]
    fn missing_preference_column_is_rejected() {
        let projects = parse_projects("name,skills\nAtlas,ml\n".as_bytes(), &skills()).unwrap();
        let csv = "name,email,lab,web dev,ml,databases\nAda,ada@example.com,02L,1,2,3\n";
        let err = parse_students(csv.as_bytes(), &skills(), &projects)
            .unwrap_err()
            .to_string();
        assert!(err.contains("missing column Atlas"), "{err}");
    }

    #[test]
    fn unparsable_rating_is_rejected() {
        let projects = parse_projects("name,skills\nAtlas,ml\n".as_bytes(), &skills()).unwrap();
        let csv = "name,email,lab,web dev,ml,databases,Atlas\nAda,ada@example.com,02L,1,x,3,4\n";
        let err = parse_students(csv.as_bytes(), &skills(), &projects)
            .unwrap_err()
            .to_string();
        assert!(err.contains("invalid skill rating"), "{err}");
        assert!(err.contains("Ada"), "{err}");
    }
}
