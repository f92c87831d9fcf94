pub mod docs;
pub mod init;
pub mod manage;
pub mod pkg;

pub use docs::{
    clean_docs_command, docs_command, ghpages_command, pdf_command, rsync_docs_command,
    showhtml_command, showpdf_command,
};
pub use init::init_command;
pub use manage::{manage_command, shell_command, start_command, syncdb_command, test_command};
pub use pkg::{
    easy_install_command, pip_install_command, pypi_command, pypi_easy_install_command,
    pypi_pip_command,
};
