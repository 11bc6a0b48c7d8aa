//! Customer directory for the user picker.
//!
//! [`CustomerDirectory`] loads the known customers from a JSON file in the
//! platform-appropriate config directory:
//!
//! | Platform | Path |
//! |----------|------|
//! | Windows  | `%APPDATA%\voice-assistant\customers.json` |
//! | macOS    | `~/Library/Application Support/voice-assistant/customers.json` |
//! | Linux    | `~/.config/voice-assistant/customers.json` |
//!
//! The directory is read-only at runtime; the file is maintained by hand or
//! by a provisioning step.  A missing or unreadable file yields an empty
//! directory so the app still starts without any customer data.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::config::AppPaths;

// ---------------------------------------------------------------------------
// Customer
// ---------------------------------------------------------------------------

/// One customer record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Customer {
    /// Stable identifier sent to the backend as the `user` field.
    pub customer_id: String,
    pub name: String,
    #[serde(default)]
    pub birthdate: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub segment_code: String,
}

// ---------------------------------------------------------------------------
// CustomerDirectory
// ---------------------------------------------------------------------------

/// All customers available in the user picker.
pub struct CustomerDirectory {
    customers: Vec<Customer>,
}

impl CustomerDirectory {
    // -----------------------------------------------------------------------
    // Construction
    // -----------------------------------------------------------------------

    /// Load the directory from the platform config directory, or return an
    /// empty directory when the file does not exist yet.
    pub fn load_or_default() -> Self {
        Self::load_from(AppPaths::new().customers_file)
    }

    /// Load the directory from an explicit path (useful for tests).
    pub fn load_from(path: PathBuf) -> Self {
        let customers = Self::load_records(&path);
        log::info!(
            "directory: loaded {} customer(s) from {}",
            customers.len(),
            path.display()
        );
        Self { customers }
    }

    fn load_records(path: &PathBuf) -> Vec<Customer> {
        if !path.exists() {
            return Vec::new();
        }
        let data = std::fs::read_to_string(path).unwrap_or_default();
        let records: Vec<Customer> = serde_json::from_str(&data).unwrap_or_default();
        // A record without an id cannot be sent to the backend.
        records
            .into_iter()
            .filter(|c| !c.customer_id.is_empty())
            .collect()
    }

    // -----------------------------------------------------------------------
    // Queries
    // -----------------------------------------------------------------------

    /// Look up a customer by id.
    pub fn find(&self, customer_id: &str) -> Option<&Customer> {
        self.customers.iter().find(|c| c.customer_id == customer_id)
    }

    /// All customers in file order.
    pub fn entries(&self) -> &[Customer] {
        &self.customers
    }

    /// Number of customers.
    pub fn len(&self) -> usize {
        self.customers.len()
    }

    /// Returns `true` when no customers are loaded.
    pub fn is_empty(&self) -> bool {
        self.customers.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
