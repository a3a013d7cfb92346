//! Deploying the embedded gadget scripts to a writable location.

use std::fs;
use std::path::PathBuf;

/// An executable resource shipped inside the binary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Script {
    pub name: &'static str,
    pub contents: &'static str,
}

/// Creates the HID gadget function and binds it, producing `/dev/hidg0`.
pub const CREATE_SCRIPT: Script = Script {
    name: "create_char_devices.sh",
    contents: include_str!("../../assets/create_char_devices.sh"),
};

/// Unbinds and removes the HID gadget function.
pub const DELETE_SCRIPT: Script = Script {
    name: "delete_char_devices.sh",
    contents: include_str!("../../assets/delete_char_devices.sh"),
};

/// Writes scripts somewhere the privileged shell can run them from.
pub trait ScriptDeployer: Send + Sync {
    fn deploy(&self, script: &Script) -> std::io::Result<PathBuf>;
}

/// Deploys scripts as owner-only executables inside a directory.
///
/// The script is rewritten on every call so an updated binary never runs a
/// stale copy.
#[derive(Debug, Clone)]
pub struct FsScriptDeployer {
    dir: PathBuf,
}

impl FsScriptDeployer {
    pub fn new(dir: PathBuf) -> Self {
        Self { dir }
    }
}

impl ScriptDeployer for FsScriptDeployer {
    fn deploy(&self, script: &Script) -> std::io::Result<PathBuf> {
        fs::create_dir_all(&self.dir)?;
        let path = self.dir.join(script.name);
        fs::write(&path, script.contents)?;

        #[cfg(unix)]
        {
            use std::fs::Permissions;
            use std::os::unix::fs::PermissionsExt;
            fs::set_permissions(&path, Permissions::from_mode(0o700))?;
        }

        log::debug!("Deployed {} to {}", script.name, path.display());
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deploys_executable_script_and_overwrites() {
        let temp = tempfile::tempdir().unwrap();
        let deployer = FsScriptDeployer::new(temp.path().join("bin"));

        let path = deployer.deploy(&CREATE_SCRIPT).unwrap();
        fs::write(&path, "stale").unwrap();
        let again = deployer.deploy(&CREATE_SCRIPT).unwrap();

        assert_eq!(path, again);
        assert_eq!(fs::read_to_string(&path).unwrap(), CREATE_SCRIPT.contents);

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let mode = fs::metadata(&path).unwrap().permissions().mode();
            assert_eq!(mode & 0o777, 0o700);
        }
    }

    #[test]
    fn embedded_scripts_are_shell_scripts() {
        for script in [CREATE_SCRIPT, DELETE_SCRIPT] {
            assert!(script.contents.starts_with("#!"), "{}", script.name);
        }
    }
}
