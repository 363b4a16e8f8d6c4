use super::Algo;
use crate::checks;
use crate::model::{Assignments, LabId, ProjectId, SkillId, StudentId};
use eyre::{Result, bail, ensure};
use good_lp::{Expression, Solution, SolverModel, Variable, constraint, default_solver, variable, variables};
use std::sync::mpsc;
use std::thread;
use std::time::{Duration, Instant};
use tracing::{debug, info};

/// Denominator applied to the accumulated preference ratings so that both
/// objective terms live on comparable scales.
const PREF_NORMALIZER: f64 = 9.0;

#[derive(Clone, Copy, Debug)]
pub struct SolveBudget {
    pub time_limit: Duration,
    /// Relative optimality gap the caller is willing to accept. The bundled
    /// backend proves optimality outright, which satisfies any nonnegative
    /// gap; backends with a native budget can consume it directly.
    pub gap: f64,
}

/// Exact strategy: the assignment is formulated as a binary integer program
/// and handed to the solver, with assignment variables `x[s][p]`, lab
/// ownership variables `y[l][p]` and skill coverage indicators `z[p][k]`.
pub struct Optimal<'a> {
    assignments: &'a mut Assignments,
    /// Objective mix in [0, 1]: weight of the preference term, the remainder
    /// going to skill coverage.
    pref_weight: f64,
    /// A student covers a required skill when rating it at least this.
    coverage_threshold: u32,
    budget: SolveBudget,
}

impl<'a> Optimal<'a> {
    pub fn new(
        assignments: &'a mut Assignments,
        pref_weight: f64,
        coverage_threshold: u32,
        budget: SolveBudget,
    ) -> Optimal<'a> {
        Optimal {
            assignments,
            pref_weight,
            coverage_threshold,
            budget,
        }
    }

    fn solve(&mut self) -> Result<()> {
        let a = &*self.assignments;
        let slen = a.students.len();
        let plen = a.projects.len();
        let llen = a.labs.len();

        let mut vars = variables!();
        let x: Vec<Vec<Variable>> = (0..slen)
            .map(|_| (0..plen).map(|_| vars.add(variable().binary())).collect())
            .collect();
        let y: Vec<Vec<Variable>> = (0..llen)
            .map(|_| (0..plen).map(|_| vars.add(variable().binary())).collect())
            .collect();
        let z: Vec<Vec<(SkillId, Variable)>> = a
            .projects
            .iter()
            .map(|p| {
                p.required_skills()
                    .map(|k| (k, vars.add(variable().binary())))
                    .collect()
            })
            .collect();

        // Preference term, normalized; coverage term, expressed as the mean
        // percentage of required skills covered across projects.
        let mut objective = Expression::from(0.0);
        for (s, row) in x.iter().enumerate() {
            for (p, &var) in row.iter().enumerate() {
                let preference = f64::from(a.student(StudentId(s)).preference(ProjectId(p)));
                objective += self.pref_weight * preference / PREF_NORMALIZER * var;
            }
        }
        for (p, indicators) in z.iter().enumerate() {
            let required = a.project(ProjectId(p)).required_count();
            for &(_, var) in indicators {
                objective +=
                    (1.0 - self.pref_weight) * 100.0 / (required as f64 * plen as f64) * var;
            }
        }

        let mut model = vars.maximise(objective).using(default_solver);

        // Every student lands on exactly one project.
        for row in &x {
            let picked = row
                .iter()
                .fold(Expression::from(0.0), |acc, &var| acc + var);
            model = model.with(constraint!(picked == 1.0));
        }
        // Every team is filled to exactly its fixed capacity.
        for p in 0..plen {
            let members = x
                .iter()
                .fold(Expression::from(0.0), |acc, row| acc + row[p]);
            model = model.with(constraint!(members == a.capacity(ProjectId(p)) as f64));
        }
        // Every project is owned by exactly one lab, and students may only
        // join projects owned by their own lab.
        for p in 0..plen {
            let owners = y
                .iter()
                .fold(Expression::from(0.0), |acc, row| acc + row[p]);
            model = model.with(constraint!(owners == 1.0));
        }
        for (s, row) in x.iter().enumerate() {
            let lab = a.lab_of(StudentId(s));
            for (p, &var) in row.iter().enumerate() {
                let owner = y[lab.0][p];
                model = model.with(constraint!(var <= owner));
            }
        }
        // A coverage indicator may only rise if some assigned student
        // actually covers the skill.
        for (p, indicators) in z.iter().enumerate() {
            for &(skill, indicator) in indicators {
                let covering = (0..slen)
                    .filter(|&s| a.student(StudentId(s)).rating(skill) >= self.coverage_threshold)
                    .fold(Expression::from(0.0), |acc, s| acc + x[s][p]);
                model = model.with(constraint!(covering >= indicator));
            }
        }

        info!(
            "solving assignment program: {} students, {} projects, {} labs (time limit {}s, gap {})",
            slen,
            plen,
            llen,
            self.budget.time_limit.as_secs(),
            self.budget.gap
        );
        let start = Instant::now();
        let (tx, rx) = mpsc::channel();
        thread::spawn(move || {
            let _ = tx.send(model.solve());
        });
        let solution = match rx.recv_timeout(self.budget.time_limit) {
            Ok(Ok(solution)) => solution,
            Ok(Err(e)) => bail!("solver found no assignment: {e}"),
            Err(_) => bail!(
                "solver exceeded its time budget of {} seconds",
                self.budget.time_limit.as_secs()
            ),
        };
        debug!("solver finished in {:.2?}", start.elapsed());

        // Lab ownership first, so that the assignment commits below see a
        // consistent project/lab mapping.
        for p in 0..plen {
            let Some(owner) = (0..llen).find(|&l| solution.value(y[l][p]) > 0.5) else {
                bail!(
                    "solver left project {} without a lab",
                    self.assignments.project(ProjectId(p)).name
                );
            };
            self.assignments.set_project_lab(ProjectId(p), LabId(owner));
        }
        for (s, row) in x.iter().enumerate() {
            for (p, &var) in row.iter().enumerate() {
                if solution.value(var) > 0.5 {
                    self.assignments.assign_to(StudentId(s), ProjectId(p));
                    break;
                }
            }
        }
        Ok(())
    }
}

impl Algo for Optimal<'_> {
    fn assign(&mut self) -> Result<()> {
        ensure!(
            (0.0..=1.0).contains(&self.pref_weight),
            "preference weight {} is not within [0, 1]",
            self.pref_weight
        );
        ensure!(
            (0.0..1.0).contains(&self.budget.gap),
            "optimality gap {} is not within [0, 1)",
            self.budget.gap
        );
        checks::ensure_capacity(self.assignments)?;
        self.solve()
    }

    fn get_assignments(&self) -> &Assignments {
        self.assignments
    }
}
