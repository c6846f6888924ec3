pub mod bugreport;
pub mod files;
pub mod terminal;
pub mod version;

pub const VERSION_SUBCOMMAND: &str = "version";
pub const VERSION_DESCRIPTION: &str = "Display the version and build information";

pub const BUGREPORT_SUBCOMMAND: &str = "bugreport";
pub const BUGREPORT_DESCRIPTION: &str = "Collect information about the system and the environment that you can attach to a bug report";

pub const LIST_SUBCOMMAND: &str = "list";
pub const LIST_DESCRIPTION: &str = "List your files with storage statistics";

pub const DOWNLOAD_SUBCOMMAND: &str = "download";
pub const DOWNLOAD_DESCRIPTION: &str = "Download a file into a local directory";

pub const DELETE_SUBCOMMAND: &str = "delete";
pub const DELETE_DESCRIPTION: &str = "Delete one or more files from storage and the database";

pub const SHARE_SUBCOMMAND: &str = "share";
pub const SHARE_DESCRIPTION: &str = "Share a verification link of a file";
