pub mod badges;
pub mod profile;
pub mod random;
pub mod session;
