//! Authorization attempt and its terminal outcome.

/// How the palm code was obtained for an attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthMethod {
    /// The operator typed a previously issued code.
    Manual,
    /// The code came from a capture session scan.
    Scan,
}

/// Confirmation details for an approved attempt.
#[derive(Debug, Clone, PartialEq)]
pub struct Confirmation {
    /// Order id, when the service reported one.
    pub order_id: Option<String>,
    /// Authorized amount.
    pub amount: f64,
    /// Distinct items in the purchase; zero for a top-up.
    pub item_count: usize,
}

/// The single terminal outcome of an authorization attempt.
///
/// No outcome triggers an automatic retry; the user must re-attempt.
#[derive(Debug, Clone, PartialEq)]
pub enum AuthOutcome {
    /// Submission has not completed yet.
    Pending,
    /// Authorized; the caller clears the cart / updates the balance.
    Approved(Confirmation),
    /// Balance too low; both figures are rendered verbatim.
    InsufficientBalance {
        current_balance: f64,
        required_amount: f64,
    },
    /// The code did not verify; re-check or rescan.
    InvalidCode,
    /// No palm is bound to the profile yet.
    NotVerified,
    /// Anything else, with a displayable message.
    Failed(String),
}

impl AuthOutcome {
    /// True once the attempt has reached a terminal outcome.
    pub fn is_terminal(&self) -> bool {
        !matches!(self, Self::Pending)
    }
}

impl std::fmt::Display for AuthOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Pending => write!(f, "Processing..."),
            Self::Approved(confirmation) => write!(
                f,
                "Order {} approved for ₭{} ({} items)",
                confirmation.order_id.as_deref().unwrap_or("N/A"),
                confirmation.amount,
                confirmation.item_count
            ),
            Self::InsufficientBalance {
                current_balance,
                required_amount,
            } => write!(
                f,
                "Insufficient balance. Current: ₭{current_balance}, Required: ₭{required_amount}"
            ),
            Self::InvalidCode => write!(
                f,
                "Palm verification failed. Please check your palm code or try scanning again."
            ),
            Self::NotVerified => write!(
                f,
                "Your palm is not verified in the system. Please register your palm first."
            ),
            Self::Failed(message) => write!(f, "{message}"),
        }
    }
}

/// One submission of a palm code plus an amount to the ledger.
///
/// Created per checkout submission and discarded after rendering; the
/// attempt always carries exactly one code and one amount.
#[derive(Debug, Clone)]
pub struct AuthorizationAttempt {
    /// How the code was obtained.
    pub method: AuthMethod,
    /// The submitted palm code.
    pub code: String,
    /// The submitted amount.
    pub amount: f64,
    /// The terminal outcome.
    pub outcome: AuthOutcome,
}
