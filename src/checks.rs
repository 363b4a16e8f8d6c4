use crate::model::Assignments;
use eyre::{Result, bail, ensure};

/// The sizer must produce exactly one team per project, or the allocator
/// cannot hand every project a lab.
pub fn ensure_team_count(a: &Assignments, sizes: &[Vec<usize>]) -> Result<()> {
    let teams: usize = sizes.iter().map(Vec::len).sum();
    ensure!(
        teams == a.projects.len(),
        "the labs form {} teams for {} projects; adjust the base team size or the duplication list",
        teams,
        a.projects.len()
    );
    Ok(())
}

/// Check that every lab's team capacities exactly seat its population. Run
/// before any assignment is committed.
pub fn ensure_capacity(a: &Assignments) -> Result<()> {
    for lab in &a.labs {
        let seats: usize = a
            .projects_in_lab(lab.id)
            .into_iter()
            .map(|p| a.capacity(p))
            .sum();
        if seats < lab.population {
            bail!(
                "lab {} can seat {} students out of {} (short by {})",
                lab.code,
                seats,
                lab.population,
                lab.population - seats
            );
        }
        if seats > lab.population {
            bail!(
                "lab {} has {} seats for only {} students ({} would stay empty)",
                lab.code,
                seats,
                lab.population,
                seats - lab.population
            );
        }
    }
    Ok(())
}

/// Post-run invariants: every student placed on a project of their own lab,
/// every team filled to exactly its capacity.
pub fn ensure_assigned(a: &Assignments) -> Result<()> {
    for s in a.all_students() {
        match a.project_for(s) {
            None => bail!("student {} was not assigned any project", a.student(s).name),
            Some(p) => ensure!(
                a.project_lab(p) == Some(a.lab_of(s)),
                "student {} was assigned to {} outside lab {}",
                a.student(s).name,
                a.project(p).name,
                a.lab(a.lab_of(s)).code
            ),
        }
    }
    for p in a.all_projects() {
        ensure!(
            a.size(p) == a.capacity(p),
            "project {} has {} members for a capacity of {}",
            a.project(p).name,
            a.size(p),
            a.capacity(p)
        );
    }
    Ok(())
}
