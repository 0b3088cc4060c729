//! Representation of a normalized email address

use std::{
    error::Error as StdError,
    fmt::{Display, Formatter, Result as FmtResult},
    net::IpAddr,
    str::FromStr,
};

use email_address::EmailAddress;
use idna::domain_to_ascii;

/// Represents a validated email address in canonical form (_user@domain.tld_).
///
/// Parsing normalizes the input the way the mailer stores recipients: the
/// string is trimmed and lower-cased before validation, so `" User@Example.COM "`
/// and `"user@example.com"` parse to the same address.
///
/// # Examples
///
/// ```
/// use postino::Address;
///
/// # use std::error::Error;
/// # fn main() -> Result<(), Box<dyn Error>> {
/// let address = " User@Example.COM ".parse::<Address>()?;
/// assert_eq!(address.as_ref(), "user@example.com");
/// assert_eq!(address.user(), "user");
/// assert_eq!(address.domain(), "example.com");
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, PartialOrd, Ord, PartialEq, Eq, Hash)]
pub struct Address {
    /// Complete address
    serialized: String,
    /// Index into `serialized` before the '@'
    at_start: usize,
}

impl Address {
    /// Gets the user portion of the `Address`.
    pub fn user(&self) -> &str {
        &self.serialized[..self.at_start]
    }

    /// Gets the domain portion of the `Address`.
    pub fn domain(&self) -> &str {
        &self.serialized[self.at_start + 1..]
    }

    fn check_user(user: &str) -> Result<(), AddressError> {
        if EmailAddress::is_valid_local_part(user) {
            Ok(())
        } else {
            Err(AddressError::InvalidUser)
        }
    }

    fn check_domain(domain: &str) -> Result<(), AddressError> {
        Address::check_domain_ascii(domain).or_else(|_| {
            domain_to_ascii(domain)
                .map_err(|_| AddressError::InvalidDomain)
                .and_then(|domain| Address::check_domain_ascii(&domain))
        })
    }

    fn check_domain_ascii(domain: &str) -> Result<(), AddressError> {
        // Domain
        if EmailAddress::is_valid_domain(domain) {
            return Ok(());
        }

        // IP
        let ip = domain
            .strip_prefix('[')
            .and_then(|ip| ip.strip_suffix(']'))
            .unwrap_or(domain);

        if ip.parse::<IpAddr>().is_ok() {
            return Ok(());
        }

        Err(AddressError::InvalidDomain)
    }
}

impl Display for Address {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(&self.serialized)
    }
}

impl FromStr for Address {
    type Err = AddressError;

    fn from_str(val: &str) -> Result<Self, AddressError> {
        let serialized = val.trim().to_lowercase();
        let at_start = check_address(&serialized)?;
        Ok(Address {
            serialized,
            at_start,
        })
    }
}

impl AsRef<str> for Address {
    fn as_ref(&self) -> &str {
        &self.serialized
    }
}

fn check_address(val: &str) -> Result<usize, AddressError> {
    let mut parts = val.rsplitn(2, '@');
    let domain = parts.next().ok_or(AddressError::MissingParts)?;
    let user = parts.next().ok_or(AddressError::MissingParts)?;

    Address::check_user(user)?;
    Address::check_domain(domain)?;
    Ok(user.len())
}

/// Errors in email address parsing
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
#[non_exhaustive]
pub enum AddressError {
    /// Missing domain or user
    MissingParts,
    /// Invalid email user
    InvalidUser,
    /// Invalid email domain
    InvalidDomain,
}

impl StdError for AddressError {}

impl Display for AddressError {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            AddressError::MissingParts => f.write_str("Missing domain or user"),
            AddressError::InvalidUser => f.write_str("Invalid email user"),
            AddressError::InvalidDomain => f.write_str("Invalid email domain"),
        }
    }
}

#[cfg(feature = "serde")]
mod serde {
    use std::fmt::{Formatter, Result as FmtResult};

    use serde::{
        de::{Deserializer, Error as DeError, Visitor},
        ser::Serializer,
        Deserialize, Serialize,
    };

    use super::Address;

    impl Serialize for Address {
        fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
        where
            S: Serializer,
        {
            serializer.serialize_str(self.as_ref())
        }
    }

    impl<'de> Deserialize<'de> for Address {
        fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
        where
            D: Deserializer<'de>,
        {
            struct AddressVisitor;

            impl Visitor<'_> for AddressVisitor {
                type Value = Address;

                fn expecting(&self, formatter: &mut Formatter<'_>) -> FmtResult {
                    formatter.write_str("an email address string")
                }

                fn visit_str<E>(self, value: &str) -> Result<Address, E>
                where
                    E: DeError,
                {
                    value.parse().map_err(DeError::custom)
                }
            }

            deserializer.deserialize_str(AddressVisitor)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ascii_address() {
        let addr = Address::from_str("something@example.com").unwrap();
        assert_eq!(addr.user(), "something");
        assert_eq!(addr.domain(), "example.com");
        assert_eq!(addr.as_ref(), "something@example.com");
    }

    #[test]
    fn normalizes_case_and_whitespace() {
        let addr = Address::from_str("  John.Doe@Example.COM ").unwrap();
        assert_eq!(addr.as_ref(), "john.doe@example.com");
    }

    #[test]
    fn ascii_address_ipv4() {
        let addr = Address::from_str("something@1.1.1.1").unwrap();
        assert_eq!(addr.domain(), "1.1.1.1");
    }

    #[test]
    fn ascii_address_ipv6() {
        let addr = Address::from_str("something@[2606:4700:4700::1111]").unwrap();
        assert_eq!(addr.domain(), "[2606:4700:4700::1111]");
    }

    #[cfg(feature = "serde")]
    #[test]
    fn serializes_as_a_string() {
        let addr = Address::from_str("user@example.com").unwrap();
        let json = serde_json::to_string(&addr).unwrap();
        assert_eq!(json, "\"user@example.com\"");

        let back: Address = serde_json::from_str("\" User@Example.COM \"").unwrap();
        assert_eq!(back, addr);
    }

    #[test]
    fn rejects_invalid_input() {
        assert_eq!(
            Address::from_str("not-an-email").unwrap_err(),
            AddressError::MissingParts
        );
        assert_eq!(Address::from_str("").unwrap_err(), AddressError::MissingParts);
        assert_eq!(
            Address::from_str("a@").unwrap_err(),
            AddressError::InvalidDomain
        );
        assert_eq!(
            Address::from_str("@example.com").unwrap_err(),
            AddressError::InvalidUser
        );
    }
}
