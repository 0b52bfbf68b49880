// Domain models

mod container;
mod git;
mod parse;
mod port;
mod process;
mod snapshot;

pub use container::{ContainerRecord, ContainerState, ContainerUsage, PortBinding};
pub use git::{GitRepoStatus, repo_display_name};
pub use parse::{ParseFailure, ParseReport};
pub use port::{ListeningPort, ProcessDetails, WILDCARD_ADDRESS};
pub use process::DevProcess;
pub use snapshot::{CollectorSlot, CollectorStatus, Snapshot};
