//! Closed role classification embedded in access-token claims.

// self
use crate::_prelude::*;

/// Role classification asserted by access tokens.
///
/// The set is closed; unrecognized labels fail both parsing and deserialization.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
	/// Default role for authenticated subjects.
	User,
	/// Elevated role with administrative access.
	Admin,
}
impl Role {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			Role::User => "USER",
			Role::Admin => "ADMIN",
		}
	}
}
impl Display for Role {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}
impl FromStr for Role {
	type Err = UnknownRoleError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		match s {
			"USER" => Ok(Role::User),
			"ADMIN" => Ok(Role::Admin),
			_ => Err(UnknownRoleError { label: s.to_owned() }),
		}
	}
}

/// Error returned when parsing an unrecognized role label.
#[derive(Clone, Debug, PartialEq, Eq, ThisError)]
#[error("Unknown role label: {label}.")]
pub struct UnknownRoleError {
	/// The unrecognized label.
	pub label: String,
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn serde_uses_screaming_snake_labels() {
		assert_eq!(serde_json::to_string(&Role::User).expect("Role should serialize."), "\"USER\"");
		assert_eq!(
			serde_json::from_str::<Role>("\"ADMIN\"").expect("Role should deserialize."),
			Role::Admin
		);
		assert!(serde_json::from_str::<Role>("\"SUPERUSER\"").is_err());
	}

	#[test]
	fn parse_round_trips_labels() {
		for role in [Role::User, Role::Admin] {
			assert_eq!(role.as_str().parse::<Role>().expect("Label should parse."), role);
		}

		assert!("operator".parse::<Role>().is_err());
	}
}
