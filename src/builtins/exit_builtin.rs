use crate::error::{ExitSignal, ShellError};
use crate::runtime::Runtime;

/// Implementation of the `exit` builtin
///
/// Usage:
///   exit [N]
///
/// Leave the interpreter with exit code N, or with the status of the last
/// foreground command when N is omitted. N must be made of decimal digits
/// only; anything else is an error and the interpreter keeps running.
///
/// This only validates and returns an [`ExitSignal`]. Interrupting the
/// process group, printing the notice and exiting happen at the top level.
///
/// Examples:
///   exit        # Exit with $?
///   exit 7      # Exit with code 7
pub fn builtin_exit(code: Option<&str>, runtime: &Runtime) -> Result<ExitSignal, ShellError> {
    let exit_code = match code {
        None => runtime.last_status(),
        Some(arg) => parse_exit_code(arg)?,
    };

    Ok(ExitSignal { exit_code })
}

/// Digits only, reduced modulo 256 the way the kernel reports exit codes.
/// An empty argument (e.g. from an empty `$!`) counts as 0.
fn parse_exit_code(arg: &str) -> Result<i32, ShellError> {
    if !arg.bytes().all(|b| b.is_ascii_digit()) {
        return Err(ShellError::InvalidExitCode(arg.to_string()));
    }

    let code = arg
        .bytes()
        .fold(0u32, |acc, digit| (acc * 10 + u32::from(digit - b'0')) % 256);
    Ok(code as i32)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_no_args_uses_last_status() {
        let mut runtime = Runtime::new();
        assert_eq!(builtin_exit(None, &runtime).unwrap().exit_code, 0);

        runtime.set_last_status(3);
        assert_eq!(builtin_exit(None, &runtime).unwrap().exit_code, 3);
    }

    #[test]
    fn test_exit_with_code() {
        let runtime = Runtime::new();
        assert_eq!(builtin_exit(Some("7"), &runtime).unwrap().exit_code, 7);
        assert_eq!(builtin_exit(Some("007"), &runtime).unwrap().exit_code, 7);
        assert_eq!(builtin_exit(Some("255"), &runtime).unwrap().exit_code, 255);
    }

    #[test]
    fn test_exit_code_wraps_like_the_kernel() {
        let runtime = Runtime::new();
        assert_eq!(builtin_exit(Some("256"), &runtime).unwrap().exit_code, 0);
        assert_eq!(builtin_exit(Some("300"), &runtime).unwrap().exit_code, 44);
        assert_eq!(
            builtin_exit(Some("99999999999999999999"), &runtime).unwrap().exit_code,
            (99999999999999999999u128 % 256) as i32
        );
    }

    #[test]
    fn test_exit_with_invalid_code() {
        let runtime = Runtime::new();
        for arg in ["abc", "-1", "1.5", "7x", " 7"] {
            let err = builtin_exit(Some(arg), &runtime).unwrap_err();
            assert!(matches!(err, ShellError::InvalidExitCode(_)), "{}", arg);
            assert_eq!(err.status(), 1);
        }
    }

    #[test]
    fn test_exit_with_empty_argument() {
        let runtime = Runtime::new();
        assert_eq!(builtin_exit(Some(""), &runtime).unwrap().exit_code, 0);
    }
}
