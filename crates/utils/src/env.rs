// Copyright 2025 Irreducible Inc.

/// Read boolean flag from the environment variable.
pub fn boolean_env_flag_set(flag: &str) -> bool {
	match std::env::var(flag) {
		Ok(val) => ["1", "on", "ON", "true", "TRUE", "yes", "YES"].contains(&val.as_str()),
		Err(_) => false,
	}
}

/// Read an unsigned integer from the environment variable.
///
/// Returns `None` when the variable is unset or does not parse.
pub fn usize_env_var(var: &str) -> Option<usize> {
	std::env::var(var).ok()?.trim().parse().ok()
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_unset_flag_is_false() {
		assert!(!boolean_env_flag_set("ZKACCEL_TEST_FLAG_THAT_IS_NEVER_SET"));
		assert_eq!(usize_env_var("ZKACCEL_TEST_FLAG_THAT_IS_NEVER_SET"), None);
	}

	#[test]
	fn test_flag_and_number_parsing() {
		const FLAG: &str = "ZKACCEL_UTILS_TEST_FLAG";
		const NUMBER: &str = "ZKACCEL_UTILS_TEST_NUMBER";

		for value in ["1", "on", "true", "YES"] {
			std::env::set_var(FLAG, value);
			assert!(boolean_env_flag_set(FLAG), "{value}");
		}
		for value in ["0", "off", "", "enabled"] {
			std::env::set_var(FLAG, value);
			assert!(!boolean_env_flag_set(FLAG), "{value}");
		}
		std::env::remove_var(FLAG);

		std::env::set_var(NUMBER, " 42 ");
		assert_eq!(usize_env_var(NUMBER), Some(42));
		for garbage in ["abc", "-1", "1.5", ""] {
			std::env::set_var(NUMBER, garbage);
			assert_eq!(usize_env_var(NUMBER), None, "{garbage}");
		}
		std::env::remove_var(NUMBER);
	}
}
