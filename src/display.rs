use crate::model::{Assignments, ProjectId, StudentId};
use crate::stats;
use eyre::{Result, WrapErr};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

pub fn display_details(a: &Assignments) {
    let mut projects = a.projects.clone();
    projects.sort_by_key(|p| p.name.clone());
    for p in &projects {
        let mut students = a.students_for(p.id).clone();
        students.sort_by_key(|&s| a.student(s).name.clone());
        if students.is_empty() {
            continue;
        }
        let lab = a
            .project_lab(p.id)
            .map_or_else(|| "?".to_owned(), |l| a.lab(l).code.clone());
        println!("{} (lab {}):", p.name, lab);
        for s in students {
            println!(
                "  - {} (preference {})",
                a.student(s).name,
                a.student(s).preference(p.id)
            );
        }
        println!();
    }
}

pub fn display_stats(a: &Assignments, coverage_threshold: u32) {
    let granted = stats::preference_distribution(a);
    let cumul = granted.iter().scan(0, |acc, &n| {
        *acc += n;
        Some(*acc)
    });
    let total: usize = granted.iter().sum();
    println!("Granted preference ratings:");
    for (rating, (n, c)) in granted.iter().zip(cumul).enumerate() {
        if *n != 0 {
            println!(
                "  - rating {}: {} (cumulative {} - {:.2}%)",
                rating,
                n,
                c,
                100.0 * c as f32 / total as f32
            );
        }
    }
    let frequency = stats::skill_frequency(a, coverage_threshold);
    println!("Team summaries (classwide coverage baseline in parentheses):");
    let mut projects = a.projects.clone();
    projects.sort_by_key(|p| p.name.clone());
    for p in &projects {
        println!("{}", team_summary(a, p.id, coverage_threshold, &frequency));
    }
}

fn team_summary(
    a: &Assignments,
    project: ProjectId,
    coverage_threshold: u32,
    frequency: &[f64],
) -> String {
    format!(
        "  - {}: average preference {:.2}, skills covered {}% ({:.0}%)",
        a.project(project).name,
        stats::average_assigned_preference(a, project),
        stats::fulfilled_skills_percent(a, project, coverage_threshold),
        stats::expected_coverage(a, project, frequency)
    )
}

/// Write the plain-text roster consumed by the teaching staff: one block per
/// project with its lab, required skills, and members with their relevant
/// skills and preference.
pub fn write_report(a: &Assignments, proficiency_threshold: u32, path: &Path) -> Result<()> {
    let file = File::create(path).wrap_err_with(|| format!("cannot create {}", path.display()))?;
    let mut out = BufWriter::new(file);
    let mut projects = a.projects.clone();
    projects.sort_by_key(|p| p.name.clone());
    for p in &projects {
        let lab = a
            .project_lab(p.id)
            .map_or_else(|| "?".to_owned(), |l| a.lab(l).code.clone());
        writeln!(out, "{}, Lab {}", p.name, lab)?;
        let skills = p
            .required_skills()
            .map(|k| a.skill_name(k).to_owned())
            .collect::<Vec<_>>();
        writeln!(out, "Skills: {}", skills.join(", "))?;
        writeln!(out, "Student, Email - Relevant Skills")?;
        for &s in a.students_for(p.id) {
            writeln!(
                out,
                "{}, {} - {} - Preference for this project: {}",
                a.student(s).name,
                a.student(s).email,
                relevant_skills(a, s, p.id, proficiency_threshold).join(", "),
                a.student(s).preference(p.id)
            )?;
        }
        writeln!(out)?;
    }
    Ok(())
}

/// Required skills the student is proficient in, title-cased for the report.
fn relevant_skills(
    a: &Assignments,
    student: StudentId,
    project: ProjectId,
    threshold: u32,
) -> Vec<String> {
    a.project(project)
        .required_skills()
        .filter(|&k| a.student(student).rating(k) > threshold)
        .map(|k| {
            let name = a.skill_name(k);
            let mut chars = name.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().collect::<String>() + &chars.as_str().to_lowercase(),
                None => String::new(),
            }
        })
        .collect()
}
