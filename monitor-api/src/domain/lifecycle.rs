use rust_decimal::Decimal;
use time::OffsetDateTime;
use url::Url;

use super::{
    models::{AuthorRole, Comment, ExpenseItem, QuarterlyReport, ReportStatus, UserId},
    MonitoringError,
};

pub const MAX_COMMENT_CHARS: usize = 2000;
pub const MAX_EXPENSE_DESCRIPTION_CHARS: usize = 500;
/// Upper bound for a single expense item.
pub const MAX_EXPENSE_AMOUNT: i64 = 1_000_000_000_000_000;

/// A proponent's quarterly report submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportSubmission {
    pub submitted_by: UserId,
    /// Kept signed so out-of-range input is reported rather than truncated.
    pub progress: i32,
    pub expenses: Vec<ExpenseItem>,
    pub proof_files: Vec<String>,
    pub note: Option<String>,
}

impl ReportSubmission {
    /// Checks the submission independent of any report state.
    pub fn validate(&self) -> Result<(), MonitoringError> {
        if self.expenses.is_empty() {
            return Err(MonitoringError::EmptyExpenses);
        }

        for (index, item) in self.expenses.iter().enumerate() {
            let description = item.description.trim();
            if description.is_empty() {
                return Err(MonitoringError::InvalidExpense {
                    index,
                    reason: "description must not be empty".to_string(),
                });
            }
            if description.chars().count() > MAX_EXPENSE_DESCRIPTION_CHARS {
                return Err(MonitoringError::InvalidExpense {
                    index,
                    reason: format!(
                        "description must be at most {MAX_EXPENSE_DESCRIPTION_CHARS} characters"
                    ),
                });
            }
            if item.amount < Decimal::ZERO {
                return Err(MonitoringError::InvalidExpense {
                    index,
                    reason: "amount must not be negative".to_string(),
                });
            }
            if item.amount > Decimal::from(MAX_EXPENSE_AMOUNT) {
                return Err(MonitoringError::InvalidExpense {
                    index,
                    reason: format!("amount must be at most {MAX_EXPENSE_AMOUNT}"),
                });
            }
        }

        if !(0..=100).contains(&self.progress) {
            return Err(MonitoringError::InvalidProgress(self.progress));
        }

        for proof in &self.proof_files {
            Url::parse(proof).map_err(|_| MonitoringError::InvalidProofFile(proof.clone()))?;
        }

        Ok(())
    }
}

/// A comment about to be appended to a report thread.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewComment {
    pub author: UserId,
    pub role: AuthorRole,
    pub text: String,
}

impl NewComment {
    /// Returns the trimmed comment text if it is acceptable.
    pub fn validated_text(&self) -> Result<&str, MonitoringError> {
        let text = self.text.trim();
        if text.is_empty() {
            return Err(MonitoringError::EmptyComment);
        }
        if text.chars().count() > MAX_COMMENT_CHARS {
            return Err(MonitoringError::CommentTooLong {
                max: MAX_COMMENT_CHARS,
            });
        }
        Ok(text)
    }
}

impl QuarterlyReport {
    /// Due/Overdue -> Submitted.
    ///
    /// The previous-quarter gate is enforced by the timeline, which can see
    /// neighbouring reports.
    pub fn submit(
        &mut self,
        submission: &ReportSubmission,
        now: OffsetDateTime,
    ) -> Result<(), MonitoringError> {
        match self.status {
            ReportStatus::Due | ReportStatus::Overdue => {}
            ReportStatus::Submitted | ReportStatus::Verified => {
                return Err(MonitoringError::AlreadySubmitted(self.quarter))
            }
            ReportStatus::Locked => {
                return Err(MonitoringError::NotSubmittable {
                    quarter: self.quarter,
                    status: self.status,
                })
            }
        }
        submission.validate()?;

        self.status = ReportStatus::Submitted;
        self.filed_status = Some(ReportStatus::Submitted);
        self.progress = submission.progress as u8;
        self.expenses = submission
            .expenses
            .iter()
            .map(|item| ExpenseItem {
                id: item.id,
                description: item.description.trim().to_string(),
                amount: item.amount,
            })
            .collect();
        self.proofs = submission.proof_files.clone();
        self.note = submission
            .note
            .as_ref()
            .map(|note| note.trim().to_string())
            .filter(|note| !note.is_empty());
        self.submitted_by = Some(submission.submitted_by.clone());
        self.submitted_on = Some(now.date());
        Ok(())
    }

    /// Submitted -> Verified.
    pub fn verify(&mut self, verifier: &UserId) -> Result<(), MonitoringError> {
        if self.status != ReportStatus::Submitted {
            return Err(MonitoringError::NotVerifiable {
                quarter: self.quarter,
                status: self.status,
            });
        }
        self.status = ReportStatus::Verified;
        self.filed_status = Some(ReportStatus::Verified);
        self.verified_by = Some(verifier.clone());
        Ok(())
    }

    /// Appends a comment to the thread. Verified and Locked reports are closed.
    pub fn add_comment(
        &mut self,
        comment: &NewComment,
        id: Option<i64>,
        now: OffsetDateTime,
    ) -> Result<&Comment, MonitoringError> {
        if matches!(self.status, ReportStatus::Verified | ReportStatus::Locked) {
            return Err(MonitoringError::CommentsClosed {
                quarter: self.quarter,
                status: self.status,
            });
        }
        let text = comment.validated_text()?.to_string();

        self.comments.push(Comment {
            id,
            role: comment.role,
            author_id: Some(comment.author.clone()),
            text,
            timestamp: Some(now),
        });
        Ok(&self.comments[self.comments.len() - 1])
    }
}

#[cfg(test)]
mod tests {
    use time::macros::{date, datetime};

    use super::*;
    use crate::domain::models::Quarter;

    const NOW: OffsetDateTime = datetime!(2025-03-02 09:30 UTC);

    fn due_report() -> QuarterlyReport {
        QuarterlyReport::placeholder(Quarter::Q1, date!(2025 - 04 - 15), ReportStatus::Due)
    }

    fn submission() -> ReportSubmission {
        ReportSubmission {
            submitted_by: UserId::new("proponent-1"),
            progress: 40,
            expenses: vec![
                ExpenseItem::new("Lab reagents", Decimal::from(120_000)),
                ExpenseItem::new(" Travel ", Decimal::new(50_000_50, 2)),
            ],
            proof_files: vec!["https://files.example.org/q1/receipts.pdf".to_string()],
            note: Some("  First quarter done ".to_string()),
        }
    }

    fn comment(text: &str) -> NewComment {
        NewComment {
            author: UserId::new("officer-7"),
            role: AuthorRole::RnD,
            text: text.to_string(),
        }
    }

    #[test]
    fn submit_moves_due_report_to_submitted() {
        let mut report = due_report();

        report.submit(&submission(), NOW).expect("submit");

        assert_eq!(report.status, ReportStatus::Submitted);
        assert_eq!(report.progress, 40);
        assert_eq!(report.expenses.len(), 2);
        assert_eq!(report.expenses[1].description, "Travel");
        assert_eq!(report.note.as_deref(), Some("First quarter done"));
        assert_eq!(report.submitted_by, Some(UserId::new("proponent-1")));
        assert_eq!(report.submitted_on, Some(date!(2025 - 03 - 02)));
    }

    #[test]
    fn overdue_report_can_still_be_submitted() {
        let mut report = due_report();
        report.status = ReportStatus::Overdue;

        report.submit(&submission(), NOW).expect("submit overdue");

        assert_eq!(report.status, ReportStatus::Submitted);
    }

    #[test]
    fn submit_without_expenses_leaves_report_untouched() {
        let mut report = due_report();
        let before = report.clone();
        let mut empty = submission();
        empty.expenses.clear();

        let err = report.submit(&empty, NOW).unwrap_err();

        assert_eq!(err, MonitoringError::EmptyExpenses);
        assert_eq!(report, before);
    }

    #[test]
    fn submit_rejects_locked_and_repeated_submissions() {
        let mut locked = due_report();
        locked.status = ReportStatus::Locked;
        assert!(matches!(
            locked.submit(&submission(), NOW),
            Err(MonitoringError::NotSubmittable { .. })
        ));

        let mut report = due_report();
        report.submit(&submission(), NOW).expect("first submit");
        assert_eq!(
            report.submit(&submission(), NOW),
            Err(MonitoringError::AlreadySubmitted(Quarter::Q1))
        );
    }

    #[test]
    fn submission_validation() {
        let mut bad_progress = submission();
        bad_progress.progress = 101;
        assert_eq!(
            bad_progress.validate(),
            Err(MonitoringError::InvalidProgress(101))
        );
        bad_progress.progress = -1;
        assert_eq!(
            bad_progress.validate(),
            Err(MonitoringError::InvalidProgress(-1))
        );

        let mut negative = submission();
        negative.expenses[1].amount = Decimal::from(-1);
        assert!(matches!(
            negative.validate(),
            Err(MonitoringError::InvalidExpense { index: 1, .. })
        ));

        let mut blank = submission();
        blank.expenses[0].description = "   ".to_string();
        assert!(matches!(
            blank.validate(),
            Err(MonitoringError::InvalidExpense { index: 0, .. })
        ));

        let mut long = submission();
        long.expenses[0].description = "x".repeat(MAX_EXPENSE_DESCRIPTION_CHARS + 1);
        assert!(long.validate().is_err());

        let mut bad_proof = submission();
        bad_proof.proof_files.push("receipts.pdf".to_string());
        assert_eq!(
            bad_proof.validate(),
            Err(MonitoringError::InvalidProofFile("receipts.pdf".to_string()))
        );

        let mut no_proofs = submission();
        no_proofs.proof_files.clear();
        assert_eq!(no_proofs.validate(), Ok(()));
    }

    #[test]
    fn expense_amount_bounds() {
        let mut at_cap = submission();
        at_cap.expenses[0].amount = Decimal::from(MAX_EXPENSE_AMOUNT);
        assert_eq!(at_cap.validate(), Ok(()));

        let mut above_cap = submission();
        above_cap.expenses[0].amount = Decimal::from(MAX_EXPENSE_AMOUNT) + Decimal::ONE;
        assert!(matches!(
            above_cap.validate(),
            Err(MonitoringError::InvalidExpense { index: 0, .. })
        ));

        let mut huge = submission();
        huge.expenses[0].amount = Decimal::MAX;
        huge.expenses[1].amount = Decimal::MAX;
        let mut report = due_report();
        let before = report.clone();
        assert!(matches!(
            report.submit(&huge, NOW),
            Err(MonitoringError::InvalidExpense { index: 0, .. })
        ));
        assert_eq!(report, before);
    }

    #[test]
    fn verify_requires_submitted() {
        let officer = UserId::new("officer-7");
        let mut report = due_report();
        let before = report.clone();

        assert_eq!(
            report.verify(&officer),
            Err(MonitoringError::NotVerifiable {
                quarter: Quarter::Q1,
                status: ReportStatus::Due
            })
        );
        assert_eq!(report, before);

        report.submit(&submission(), NOW).expect("submit");
        report.verify(&officer).expect("verify");
        assert_eq!(report.status, ReportStatus::Verified);
        assert_eq!(report.verified_by, Some(officer.clone()));

        assert!(report.verify(&officer).is_err());
    }

    #[test]
    fn comments_are_trimmed_and_stamped() {
        let mut report = due_report();
        report.submit(&submission(), NOW).expect("submit");

        let added = report
            .add_comment(&comment("  Please attach the OR.  "), Some(9), NOW)
            .expect("comment")
            .clone();

        assert_eq!(added.text, "Please attach the OR.");
        assert_eq!(added.id, Some(9));
        assert_eq!(added.role, AuthorRole::RnD);
        assert_eq!(added.timestamp, Some(NOW));
        assert_eq!(report.comments.len(), 1);
    }

    #[test]
    fn comment_text_limits() {
        let mut report = due_report();

        assert_eq!(
            report.add_comment(&comment("   "), None, NOW),
            Err(MonitoringError::EmptyComment)
        );
        assert_eq!(
            report.add_comment(&comment(&"a".repeat(MAX_COMMENT_CHARS + 1)), None, NOW),
            Err(MonitoringError::CommentTooLong {
                max: MAX_COMMENT_CHARS
            })
        );
        assert!(report
            .add_comment(&comment(&"a".repeat(MAX_COMMENT_CHARS)), None, NOW)
            .is_ok());
    }

    #[test]
    fn verified_and_locked_reports_are_closed_for_comments() {
        for status in [ReportStatus::Verified, ReportStatus::Locked] {
            let mut report = due_report();
            report.status = status;
            assert_eq!(
                report.add_comment(&comment("Looks good"), None, NOW),
                Err(MonitoringError::CommentsClosed {
                    quarter: Quarter::Q1,
                    status
                })
            );
            assert!(report.comments.is_empty());
        }
    }
}
