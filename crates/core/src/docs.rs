//! Tasks that drive a Sphinx `make`-based documentation build.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info};
use walkdir::WalkDir;

use crate::command::{Executor, Invocation};
use crate::config::{Config, SphinxConfig};
use crate::error::{Error, Result};
use crate::probe::ToolProbe;

/// Directory layout for the Sphinx-side tasks (`ghpages`, `showhtml`,
/// `showpdf`, `pdf`).
///
/// Resolved from the `sphinx.*` options, which are a separate namespace
/// from `docs.*`: the make-driven tasks and these resolve their paths
/// independently, and always have.
#[derive(Debug, Clone)]
pub struct SphinxLayout {
    pub docroot: PathBuf,
    pub builddir: PathBuf,
    pub htmldir: PathBuf,
    pub doctrees: PathBuf,
    pub latexdir: PathBuf,
    pub srcdir: PathBuf,
}

impl SphinxLayout {
    /// Resolve the layout. Fails before any process is spawned when the
    /// documentation root does not exist.
    pub fn resolve(sphinx: &SphinxConfig) -> Result<Self> {
        let docroot = sphinx.docroot.clone();
        if !docroot.exists() {
            return Err(Error::MissingDirectory {
                what: "Sphinx documentation root",
                path: docroot,
            });
        }
        let builddir = docroot.join(&sphinx.builddir);
        let srcdir = if sphinx.sourcedir.is_empty() {
            docroot.clone()
        } else {
            docroot.join(&sphinx.sourcedir)
        };
        Ok(Self {
            htmldir: builddir.join("html"),
            doctrees: builddir.join("doctrees"),
            latexdir: builddir.join("latex"),
            docroot,
            builddir,
            srcdir,
        })
    }
}

/// Program (plus leading arguments) that hands a file to the desktop,
/// keyed by platform identifier (`std::env::consts::OS`). `start` is a
/// cmd.exe builtin, not an executable, so Windows goes through
/// `cmd /C start`. Platforms without a known opener get `None` and the
/// show tasks take no action.
pub fn platform_opener(os: &str) -> Option<(&'static str, &'static [&'static str])> {
    match os {
        "windows" => Some(("cmd", &["/C", "start"])),
        "macos" => Some(("open", &[])),
        "linux" => Some(("xdg-open", &[])),
        _ => None,
    }
}

/// The lexicographically-first `*.pdf` under `dir`, or `None` when the
/// tree holds no PDFs (including when `dir` itself is absent).
///
/// Which PDF is *the* PDF was never decided upstream; the ordering is
/// arbitrary but deterministic, nothing more.
pub fn find_pdf_file(dir: &Path) -> Option<PathBuf> {
    let mut pdfs: Vec<PathBuf> = WalkDir::new(dir)
        .into_iter()
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().is_file())
        .map(|entry| entry.into_path())
        .filter(|path| {
            path.extension()
                .is_some_and(|ext| ext.eq_ignore_ascii_case("pdf"))
        })
        .collect();
    pdfs.sort();
    pdfs.into_iter().next()
}

/// Sphinx documentation tasks, bound to a loaded config and an executor.
pub struct DocsTasks<'a> {
    config: &'a Config,
    executor: &'a dyn Executor,
    tools: &'a dyn ToolProbe,
}

impl<'a> DocsTasks<'a> {
    pub fn new(config: &'a Config, executor: &'a dyn Executor, tools: &'a dyn ToolProbe) -> Self {
        Self {
            config,
            executor,
            tools,
        }
    }

    /// Call the Sphinx Makefile with the given targets, from the
    /// configured docs folder (`docs.path`, where the Makefile resides).
    pub fn sphinx_make(&self, targets: &[String]) -> Result<()> {
        let invocation =
            Invocation::new("make", targets.to_vec()).with_cwd(&self.config.docs.path);
        self.executor.run(&invocation)
    }

    /// Make the Sphinx docs, using the configured `docs.targets`.
    pub fn docs(&self) -> Result<()> {
        self.sphinx_make(&self.config.docs.targets)
    }

    /// Clean the Sphinx build output.
    pub fn clean_docs(&self) -> Result<()> {
        self.sphinx_make(&["clean".to_string()])
    }

    /// Upload the built docs to `docs.upload_location` via rsync.
    ///
    /// The trailing slashes matter: rsync copies the *contents* of the
    /// build folder into the upload location, not the folder itself.
    pub fn rsync_docs(&self) -> Result<()> {
        let location = self
            .config
            .docs
            .upload_location
            .as_deref()
            .filter(|s| !s.is_empty())
            .ok_or(Error::MissingOption {
                key: "docs.upload_location",
                what: "rsync upload location",
            })?;
        let build = self.config.docs.path.join(&self.config.docs.build_rel);
        let invocation = Invocation::new(
            "rsync",
            vec![
                "-ravz".to_string(),
                format!("{}/", build.display()),
                format!("{location}/"),
            ],
        );
        self.executor.run(&invocation)
    }

    /// Push the built HTML docs to the gh-pages branch via `ghp-import`.
    ///
    /// A `.nojekyll` marker is created in the HTML build directory first
    /// so GitHub Pages serves `_`-prefixed folders; creating it twice is
    /// harmless.
    ///
    /// Warning: this will DESTROY your gh-pages branch. If you love it,
    /// you'll want to take backups before playing with this. This task
    /// assumes that gh-pages is 100% derivative. You should never edit
    /// files in your gh-pages branch by hand if you're using this task
    /// because you will lose your work.
    pub fn ghpages(&self) -> Result<()> {
        let htmldir = self.html_build_dir()?;
        let nojekyll = htmldir.join(".nojekyll");
        if self.executor.is_dry_run() {
            info!("dry-run: touch {}", nojekyll.display());
        } else {
            fs::File::create(&nojekyll)?;
        }
        self.executor.run(&Invocation::new(
            "ghp-import",
            vec!["-p".to_string(), htmldir.display().to_string()],
        ))
    }

    /// Display the generated HTML documentation.
    pub fn show_html(&self) -> Result<()> {
        let htmldir = self.html_build_dir()?;
        self.open_file(&htmldir.join("index.html"))
    }

    /// Display the generated PDF documentation.
    pub fn show_pdf(&self) -> Result<()> {
        let layout = SphinxLayout::resolve(&self.config.sphinx)?;
        if !layout.latexdir.exists() {
            return Err(Error::MissingDirectory {
                what: "Sphinx PDF build directory",
                path: layout.latexdir,
            });
        }
        let pdf = find_pdf_file(&layout.latexdir)
            .ok_or_else(|| Error::NoPdfFound(layout.latexdir.clone()))?;
        info!("opening {}", pdf.display());
        self.open_file(&pdf)
    }

    /// Build the PDF documentation: LaTeX sources via `sphinx-build`,
    /// `make` in the LaTeX folder, then the resulting PDF copied next to
    /// the HTML docs. Each stage aborts the pipeline on failure.
    pub fn pdf(&self) -> Result<()> {
        if !self.tools.is_runnable("sphinx-build") {
            return Err(Error::ToolNotFound {
                tool: "sphinx-build",
                install: "sphinx",
            });
        }
        let layout = SphinxLayout::resolve(&self.config.sphinx)?;
        if !layout.srcdir.exists() {
            return Err(Error::MissingDirectory {
                what: "Sphinx source directory",
                path: layout.srcdir,
            });
        }

        self.executor.run(&Invocation::new(
            "sphinx-build",
            vec![
                "-b".to_string(),
                "latex".to_string(),
                "-d".to_string(),
                layout.doctrees.display().to_string(),
                layout.srcdir.display().to_string(),
                layout.latexdir.display().to_string(),
            ],
        ))?;
        self.executor
            .run(&Invocation::new("make", vec![]).with_cwd(&layout.latexdir))?;

        if self.executor.is_dry_run() {
            info!("dry-run: copy built pdf into {}", layout.htmldir.display());
            return Ok(());
        }
        let pdf = find_pdf_file(&layout.latexdir)
            .ok_or_else(|| Error::NoPdfFound(layout.latexdir.clone()))?;
        let file_name = pdf
            .file_name()
            .ok_or_else(|| Error::NoPdfFound(layout.latexdir.clone()))?;
        fs::create_dir_all(&layout.htmldir)?;
        let target = layout.htmldir.join(file_name);
        debug!("copying {} to {}", pdf.display(), target.display());
        fs::copy(&pdf, &target)?;
        Ok(())
    }

    /// The HTML build directory, which must already exist.
    fn html_build_dir(&self) -> Result<PathBuf> {
        let layout = SphinxLayout::resolve(&self.config.sphinx)?;
        if !layout.htmldir.exists() {
            return Err(Error::MissingDirectory {
                what: "Sphinx build directory",
                path: layout.htmldir,
            });
        }
        Ok(layout.htmldir)
    }

    fn open_file(&self, file: &Path) -> Result<()> {
        match platform_opener(std::env::consts::OS) {
            Some((program, leading)) => {
                let mut args: Vec<String> = leading.iter().map(|s| s.to_string()).collect();
                args.push(file.display().to_string());
                self.executor.run(&Invocation::new(program, args))
            }
            None => {
                debug!(
                    "no opener known for platform {}; not opening {}",
                    std::env::consts::OS,
                    file.display()
                );
                Ok(())
            }
        }
    }
}
