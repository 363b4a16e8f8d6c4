use super::{Lab, LabId, Project, ProjectId, SkillId, Student, StudentId};
use eyre::{Result, ensure};

/// Central assignment state: owns the entity collections and every piece of
/// mutable run state (student placements, per-project member lists, team
/// capacities and project/lab ownership).
#[derive(Debug)]
pub struct Assignments {
    pub students: Vec<Student>,
    pub projects: Vec<Project>,
    pub skills: Vec<String>,
    pub labs: Vec<Lab>,
    lab_of_student: Vec<LabId>,
    assigned_to: Vec<Option<ProjectId>>,
    assigned: Vec<Vec<StudentId>>,
    capacity: Vec<usize>,
    lab_of_project: Vec<Option<LabId>>,
}

impl Assignments {
    /// Build the assignment state. Labs are derived from the students' lab
    /// codes in first-appearance order. Entities whose skill or preference
    /// vectors do not span the full universe are rejected here so that the
    /// engine never has to deal with missing entries.
    pub fn new(
        students: Vec<Student>,
        projects: Vec<Project>,
        skills: Vec<String>,
    ) -> Result<Assignments> {
        for student in &students {
            ensure!(
                student.preferences.len() == projects.len(),
                "student {} has {} preference entries for {} projects",
                student.name,
                student.preferences.len(),
                projects.len()
            );
            ensure!(
                student.ratings.len() == skills.len(),
                "student {} has {} skill ratings for {} skills",
                student.name,
                student.ratings.len(),
                skills.len()
            );
        }
        for project in &projects {
            ensure!(
                project.required.len() == skills.len(),
                "project {} has {} required-skill entries for {} skills",
                project.name,
                project.required.len(),
                skills.len()
            );
        }
        let mut labs: Vec<Lab> = Vec::new();
        let mut lab_of_student = Vec::with_capacity(students.len());
        for student in &students {
            let id = match labs.iter().position(|l| l.code == student.lab) {
                Some(idx) => LabId(idx),
                None => {
                    labs.push(Lab {
                        id: LabId(labs.len()),
                        code: student.lab.clone(),
                        population: 0,
                    });
                    LabId(labs.len() - 1)
                }
            };
            labs[id.0].population += 1;
            lab_of_student.push(id);
        }
        let slen = students.len();
        let plen = projects.len();
        Ok(Assignments {
            students,
            projects,
            skills,
            labs,
            lab_of_student,
            assigned_to: vec![None; slen],
            assigned: vec![Vec::new(); plen],
            capacity: vec![0; plen],
            lab_of_project: vec![None; plen],
        })
    }

    pub fn student(&self, StudentId(student): StudentId) -> &Student {
        &self.students[student]
    }

    pub fn project(&self, ProjectId(project): ProjectId) -> &Project {
        &self.projects[project]
    }

    pub fn lab(&self, LabId(lab): LabId) -> &Lab {
        &self.labs[lab]
    }

    pub fn skill_name(&self, SkillId(skill): SkillId) -> &str {
        &self.skills[skill]
    }

    pub fn all_students(&self) -> Vec<StudentId> {
        (0..self.students.len()).map(StudentId).collect()
    }

    pub fn all_projects(&self) -> Vec<ProjectId> {
        self.filter_projects(|_| true)
    }

    pub fn filter_projects<F>(&self, condition: F) -> Vec<ProjectId>
    where
        F: Fn(ProjectId) -> bool,
    {
        (0..self.projects.len())
            .map(ProjectId)
            .filter(|&project| condition(project))
            .collect()
    }

    pub fn all_skills(&self) -> Vec<SkillId> {
        (0..self.skills.len()).map(SkillId).collect()
    }

    pub fn lab_of(&self, StudentId(student): StudentId) -> LabId {
        self.lab_of_student[student]
    }

    pub fn students_in_lab(&self, lab: LabId) -> Vec<StudentId> {
        (0..self.students.len())
            .map(StudentId)
            .filter(|&s| self.lab_of(s) == lab)
            .collect()
    }

    pub fn projects_in_lab(&self, lab: LabId) -> Vec<ProjectId> {
        self.filter_projects(|p| self.project_lab(p) == Some(lab))
    }

    pub fn project_lab(&self, ProjectId(project): ProjectId) -> Option<LabId> {
        self.lab_of_project[project]
    }

    /// Give a project to a lab. The allocator may revise this while no
    /// student has been committed yet.
    pub fn set_project_lab(&mut self, project: ProjectId, lab: LabId) {
        assert!(
            self.students_for(project).is_empty(),
            "cannot move a project with assigned students to another lab"
        );
        self.lab_of_project[project.0] = Some(lab);
    }

    pub fn capacity(&self, ProjectId(project): ProjectId) -> usize {
        self.capacity[project]
    }

    pub fn set_capacity(&mut self, project: ProjectId, capacity: usize) {
        assert!(
            self.size(project) <= capacity,
            "cannot shrink a team capacity below its current size"
        );
        self.capacity[project.0] = capacity;
    }

    pub fn project_for(&self, StudentId(student): StudentId) -> Option<ProjectId> {
        self.assigned_to[student]
    }

    pub fn students_for(&self, ProjectId(project): ProjectId) -> &Vec<StudentId> {
        &self.assigned[project]
    }

    pub fn size(&self, project: ProjectId) -> usize {
        self.students_for(project).len()
    }

    pub fn is_full(&self, project: ProjectId) -> bool {
        self.size(project) >= self.capacity(project)
    }

    pub fn assign_to(&mut self, student: StudentId, project: ProjectId) {
        assert!(
            self.project_for(student).is_none(),
            "a project is already assigned to this student"
        );
        assert!(
            !self.is_full(project),
            "cannot assign to a project at capacity"
        );
        assert_eq!(
            self.project_lab(project),
            Some(self.lab_of(student)),
            "cannot assign a student to a project outside their lab"
        );
        self.assigned_to[student.0] = Some(project);
        self.assigned[project.0].push(student);
    }

    pub fn unassigned_students(&self) -> Vec<StudentId> {
        self.assigned_to
            .iter()
            .enumerate()
            .filter_map(|(id, assignment)| {
                if assignment.is_none() {
                    Some(StudentId(id))
                } else {
                    None
                }
            })
            .collect()
    }

    pub fn unassigned_students_in_lab(&self, lab: LabId) -> Vec<StudentId> {
        self.unassigned_students()
            .into_iter()
            .filter(|&s| self.lab_of(s) == lab)
            .collect()
    }
}
