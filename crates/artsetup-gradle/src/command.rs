//! Introspection of Gradle command lines.

use std::path::PathBuf;

/// True if any task would publish: `publish` or `publishTo*`, with or
/// without a `:project:path:` prefix. Case-sensitive, and flags are
/// never tasks.
///
/// # Examples
///
/// ```
/// use artsetup_gradle::command::was_publish_command;
///
/// assert!(was_publish_command(&["clean", ":lib:publish"]));
/// assert!(was_publish_command(&["publishToMavenLocal"]));
/// assert!(!was_publish_command(&["publishMavenPublicationToMavenLocal"]));
/// ```
pub fn was_publish_command<S: AsRef<str>>(tasks: &[S]) -> bool {
    tasks.iter().map(AsRef::as_ref).any(|task| {
        if task.starts_with('-') {
            return false;
        }
        let name = task.rsplit(':').next().unwrap_or(task);
        name == "publish" || name.starts_with("publishTo")
    })
}

/// Build script named on a Gradle command line, if any.
///
/// Recognises `-b <path>`, `-b<path>`, `--build-file <path>` and
/// `--build-file=<path>`, and the project-directory forms `-p`,
/// `--project-dir` (which yield `<dir>/build.gradle`). Longer flags that
/// share a prefix, like `--build-cache`, do not count. A flag with no
/// value yields `None`.
///
/// # Examples
///
/// ```
/// use artsetup_gradle::command::extract_build_file_path;
/// use std::path::PathBuf;
///
/// assert_eq!(
///     extract_build_file_path(&["-p", "/x"]),
///     Some(PathBuf::from("/x/build.gradle"))
/// );
/// assert_eq!(extract_build_file_path(&["--build-cache"]), None);
/// ```
pub fn extract_build_file_path<S: AsRef<str>>(tasks: &[S]) -> Option<PathBuf> {
    let mut args = tasks.iter().map(AsRef::as_ref);

    while let Some(arg) = args.next() {
        let (value, is_project_dir) = match arg {
            "-b" | "--build-file" => (args.next(), false),
            "-p" | "--project-dir" => (args.next(), true),
            _ => {
                if let Some(v) = arg.strip_prefix("--build-file=") {
                    (Some(v), false)
                } else if let Some(v) = arg.strip_prefix("--project-dir=") {
                    (Some(v), true)
                } else if let Some(v) = short_flag_value(arg, 'b') {
                    (Some(v), false)
                } else if let Some(v) = short_flag_value(arg, 'p') {
                    (Some(v), true)
                } else {
                    continue;
                }
            }
        };

        let value = value.filter(|v| !v.is_empty())?;
        let path = PathBuf::from(value);
        return Some(if is_project_dir {
            path.join("build.gradle")
        } else {
            path
        });
    }

    None
}

/// Value glued to a single-dash flag, as in `-b/x/build.gradle`.
fn short_flag_value(arg: &str, flag: char) -> Option<&str> {
    let rest = arg.strip_prefix('-')?;
    if rest.starts_with('-') {
        return None;
    }
    rest.strip_prefix(flag).filter(|v| !v.is_empty())
}
