// Library root: owner identity resolution, lineup optimization, and the
// team-week reporting built on top of them.

pub mod identity;
pub mod lineup;
pub mod report;
