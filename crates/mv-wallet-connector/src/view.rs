/// Styling applied to the wallet status indicator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusKind {
    Neutral,
    Verified,
    Invalid,
}

impl StatusKind {
    pub fn color(&self) -> &'static str {
        match self {
            StatusKind::Neutral => "",
            StatusKind::Verified => "green",
            StatusKind::Invalid => "red",
        }
    }
}

/// Page surface the connector writes to.
pub trait WalletView {
    fn set_status(&self, text: &str, kind: StatusKind);

    /// `None` clears the connected-address line.
    fn show_address(&self, address: Option<&str>);

    /// Blocking user-facing message.
    fn alert(&self, message: &str);
}
