use super::SkillId;

#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct ProjectId(pub usize);

#[derive(Clone, Debug)]
pub struct Project {
    pub id: ProjectId,
    /// Unique name, possibly carrying a duplication suffix ("1"/"2").
    pub name: String,
    /// Name without any duplication suffix.
    pub original_name: String,
    /// Required-skill membership over the full skill universe, indexed by `SkillId`.
    pub required: Vec<bool>,
}

impl Project {
    pub fn new(id: ProjectId, name: String, required: Vec<bool>) -> Project {
        Project {
            id,
            original_name: name.clone(),
            name,
            required,
        }
    }

    pub fn requires(&self, SkillId(skill): SkillId) -> bool {
        self.required[skill]
    }

    pub fn required_skills(&self) -> impl Iterator<Item = SkillId> + '_ {
        self.required
            .iter()
            .enumerate()
            .filter_map(|(skill, &required)| if required { Some(SkillId(skill)) } else { None })
    }

    pub fn required_count(&self) -> usize {
        self.required.iter().filter(|&&r| r).count()
    }
}

#[test]
fn test_required_skills() {
    let p = Project::new(ProjectId(0), "dummy".into(), vec![true, false, true]);
    assert_eq!(
        p.required_skills().collect::<Vec<_>>(),
        vec![SkillId(0), SkillId(2)]
    );
    assert_eq!(p.required_count(), 2);
    assert!(p.requires(SkillId(2)));
    assert!(!p.requires(SkillId(1)));
}
