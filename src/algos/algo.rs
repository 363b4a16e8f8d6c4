use crate::model::Assignments;
use eyre::Result;

pub trait Algo {
    fn assign(&mut self) -> Result<()>;
    fn get_assignments(&self) -> &Assignments;
}
