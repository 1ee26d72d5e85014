//! Terminal rendering of the bills page and of user alerts.

use std::fmt::Write as _;

use expense_client::{feedback::log_fault, BillsPage, Fault, Feedback};

/// Alerts go to stderr, faults to the log.
pub struct ConsoleFeedback;

impl Feedback for ConsoleFeedback {
    fn alert(&self, message: &str) {
        eprintln!("{message}");
    }

    fn report(&self, fault: Fault) {
        log_fault(&fault);
    }
}

pub fn render_page(page: &BillsPage) -> String {
    match page {
        BillsPage::Loading => "Loading...".to_string(),
        BillsPage::Error(message) => format!("Erreur\n{message}"),
        BillsPage::Loaded(bills) => {
            let mut out = String::from("Mes notes de frais\n");
            let _ = writeln!(
                out,
                "{:<24} {:<28} {:<12} {:>10}  {}",
                "Type", "Nom", "Date", "Montant", "Statut"
            );
            for display in bills {
                let bill = &display.bill;
                let amount = bill
                    .amount
                    .as_ref()
                    .map(|amount| format!("{amount} €"))
                    .unwrap_or_default();
                let _ = writeln!(
                    out,
                    "{:<24} {:<28} {:<12} {:>10}  {}",
                    bill.expense_type.as_deref().unwrap_or_default(),
                    bill.name.as_deref().unwrap_or_default(),
                    display.date,
                    amount,
                    display.status
                );
            }
            out
        }
    }
}

#[cfg(test)]
mod tests {
    use expense_client::format::{format_bill, DisplayBill};
    use expense_shared::domain::{BillId, BillStatus, RawBill};

    use super::*;

    fn bill(name: &str, date: &str) -> RawBill {
        RawBill {
            id: BillId::new(name),
            name: Some(name.to_string()),
            expense_type: Some("Transports".to_string()),
            amount: Some(348.into()),
            date: date.to_string(),
            status: BillStatus::Accepted,
            ..RawBill::default()
        }
    }

    #[test]
    fn renders_loaded_rows_with_display_values() {
        let page = BillsPage::Loaded(vec![
            format_bill(&bill("vol", "2022-08-03")).expect("formatted"),
            DisplayBill::unformatted(bill("cassé", "???")),
        ]);

        let rendered = render_page(&page);
        let lines: Vec<&str> = rendered.lines().collect();

        assert_eq!(lines[0], "Mes notes de frais");
        assert!(lines[2].contains("3 Aoû. 22"));
        assert!(lines[2].contains("348 €"));
        assert!(lines[2].ends_with("Accepté"));
        assert!(lines[3].contains("???"));
        assert!(lines[3].ends_with("accepted"));
    }

    #[test]
    fn renders_error_and_loading_states() {
        assert!(render_page(&BillsPage::Error("Erreur 404".to_string())).contains("Erreur 404"));
        assert_eq!(render_page(&BillsPage::Loading), "Loading...");
    }
}
