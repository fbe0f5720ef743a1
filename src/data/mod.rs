//! Edge-list input for the command-line front end

pub mod edge_list;
