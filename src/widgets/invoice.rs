//! Invoice builder with line items and a flat 10% tax.

use async_trait::async_trait;
use chrono::{Local, NaiveDate};

use super::input::{parse_f64_or, parse_or, split_command, timestamped_name};
use super::{Blob, Widget, WidgetContext, WidgetError};
use crate::messaging::Message;
use crate::registry::ToolKind;

pub const TAX_RATE: f64 = 0.1;

#[derive(Debug, Clone, PartialEq)]
pub struct LineItem {
    pub id: u32,
    pub description: String,
    pub quantity: u32,
    pub price: f64,
}

impl LineItem {
    pub fn amount(&self) -> f64 {
        self.quantity as f64 * self.price
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Party {
    pub name: String,
    pub email: String,
}

impl Party {
    /// Parse `Name <email>` or `Name, email`; a bare name leaves the email empty.
    pub fn parse(input: &str) -> Self {
        let input = input.trim();
        if let Some((name, rest)) = input.split_once('<') {
            return Self {
                name: name.trim().to_string(),
                email: rest.trim_end_matches('>').trim().to_string(),
            };
        }
        match input.split_once(',') {
            Some((name, email)) => Self {
                name: name.trim().to_string(),
                email: email.trim().to_string(),
            },
            None => Self {
                name: input.to_string(),
                email: String::new(),
            },
        }
    }

    fn describe(&self, placeholder: &str) -> String {
        match (self.name.is_empty(), self.email.is_empty()) {
            (true, true) => placeholder.to_string(),
            (false, true) => self.name.clone(),
            (true, false) => self.email.clone(),
            (false, false) => format!("{} <{}>", self.name, self.email),
        }
    }
}

/// Field of a line item addressed by `set`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemField {
    Description,
    Quantity,
    Price,
}

impl ItemField {
    fn parse(input: &str) -> Option<Self> {
        match input.to_lowercase().as_str() {
            "desc" | "description" => Some(Self::Description),
            "qty" | "quantity" => Some(Self::Quantity),
            "price" => Some(Self::Price),
            _ => None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Invoice {
    pub number: String,
    pub date: NaiveDate,
    pub vendor: Party,
    pub client: Party,
    items: Vec<LineItem>,
    next_id: u32,
}

impl Invoice {
    /// A fresh invoice with one empty line item.
    pub fn new() -> Self {
        let millis = chrono::Utc::now().timestamp_millis().to_string();
        let tail = &millis[millis.len().saturating_sub(6)..];
        let mut invoice = Self {
            number: format!("INV-{}", tail),
            date: Local::now().date_naive(),
            vendor: Party::default(),
            client: Party::default(),
            items: Vec::new(),
            next_id: 1,
        };
        invoice.add_item();
        invoice
    }

    pub fn items(&self) -> &[LineItem] {
        &self.items
    }

    /// Append an empty item (quantity 1, price 0) and return its id.
    pub fn add_item(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        self.items.push(LineItem {
            id,
            description: String::new(),
            quantity: 1,
            price: 0.0,
        });
        id
    }

    pub fn remove_item(&mut self, id: u32) -> bool {
        let before = self.items.len();
        self.items.retain(|item| item.id != id);
        self.items.len() != before
    }

    pub fn item_mut(&mut self, id: u32) -> Option<&mut LineItem> {
        self.items.iter_mut().find(|item| item.id == id)
    }

    /// Set one field; malformed numbers become 0.
    pub fn update_item(&mut self, id: u32, field: ItemField, value: &str) -> bool {
        let Some(item) = self.item_mut(id) else {
            return false;
        };
        match field {
            ItemField::Description => item.description = value.to_string(),
            ItemField::Quantity => item.quantity = parse_or(value, 0),
            ItemField::Price => item.price = parse_f64_or(value, 0.0),
        }
        true
    }

    pub fn subtotal(&self) -> f64 {
        self.items.iter().map(LineItem::amount).sum()
    }

    pub fn tax(&self) -> f64 {
        self.subtotal() * TAX_RATE
    }

    pub fn total(&self) -> f64 {
        self.subtotal() + self.tax()
    }

    /// Plain-text rendering used for display and export.
    pub fn lines(&self) -> Vec<String> {
        let mut lines = vec![
            format!("#{}  {}", self.number, self.date.format("%Y-%m-%d")),
            format!("From: {}", self.vendor.describe("(your company)")),
            format!("To:   {}", self.client.describe("(client)")),
            String::new(),
            format!(
                "{:>3}  {:<28} {:>5} {:>10} {:>10}",
                "#", "Item", "Qty", "Price", "Total"
            ),
        ];
        for item in &self.items {
            let desc = if item.description.is_empty() {
                "(description)"
            } else {
                &item.description
            };
            lines.push(format!(
                "{:>3}  {:<28} {:>5} {:>10} {:>10}",
                item.id,
                desc,
                item.quantity,
                money(item.price),
                money(item.amount())
            ));
        }
        lines.push(String::new());
        lines.push(format!("{:>48} {:>10}", "Subtotal", money(self.subtotal())));
        lines.push(format!("{:>48} {:>10}", "Tax (10%)", money(self.tax())));
        lines.push(format!("{:>48} {:>10}", "Total", money(self.total())));
        lines
    }
}

impl Default for Invoice {
    fn default() -> Self {
        Self::new()
    }
}

pub fn money(amount: f64) -> String {
    format!("${:.2}", amount)
}

const USAGE: &[(&str, &str)] = &[
    ("vendor <name> [<email>]", "Set who the invoice is from"),
    ("client <name> [<email>]", "Set who the invoice is to"),
    ("add [description]", "Add a line item"),
    ("set <id> desc|qty|price <value>", "Update a line item"),
    ("remove <id>", "Remove a line item"),
    ("export", "Save the invoice as a text file"),
    ("show", "Show the invoice"),
];

pub struct InvoiceWidget {
    invoice: Invoice,
    export: Option<Blob>,
}

impl InvoiceWidget {
    pub fn new() -> Self {
        Self {
            invoice: Invoice::new(),
            export: None,
        }
    }

    pub fn invoice(&self) -> &Invoice {
        &self.invoice
    }

    fn set(&mut self, arg: &str) -> Result<(), WidgetError> {
        const EXPECTED: &str = "set <id> desc|qty|price <value>";
        let mut parts = arg.splitn(3, char::is_whitespace);
        let id = parts
            .next()
            .and_then(|s| s.parse::<u32>().ok())
            .ok_or(WidgetError::Usage(EXPECTED))?;
        let field = parts
            .next()
            .and_then(ItemField::parse)
            .ok_or(WidgetError::Usage(EXPECTED))?;
        let value = parts.next().unwrap_or("").trim();
        if !self.invoice.update_item(id, field, value) {
            return Err(WidgetError::Invalid(format!("No line item with id {}", id)));
        }
        Ok(())
    }

    fn export(&mut self, ctx: &WidgetContext) -> Result<Message, WidgetError> {
        let text = self.invoice.lines().join("\n") + "\n";
        let blob = self
            .export
            .insert(Blob::new(timestamped_name("invoice", "txt"), text.as_bytes())?);
        let dest = blob.save_to(&ctx.output_dir)?;
        Ok(Message::success(format!("Saved {}", dest.display())))
    }
}

impl Default for InvoiceWidget {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Widget for InvoiceWidget {
    fn kind(&self) -> ToolKind {
        ToolKind::InvoiceMaker
    }

    fn usage(&self) -> &'static [(&'static str, &'static str)] {
        USAGE
    }

    fn render(&self) -> Message {
        Message::panel("INVOICE", self.invoice.lines())
    }

    async fn handle(
        &mut self,
        input: &str,
        ctx: &WidgetContext,
    ) -> Result<Vec<Message>, WidgetError> {
        let (cmd, arg) = split_command(input);
        match cmd.as_str() {
            "vendor" | "from" => self.invoice.vendor = Party::parse(arg),
            "client" | "to" => self.invoice.client = Party::parse(arg),
            "add" => {
                let id = self.invoice.add_item();
                if !arg.is_empty() {
                    self.invoice.update_item(id, ItemField::Description, arg);
                }
            }
            "set" | "update" => self.set(arg)?,
            "remove" | "rm" => {
                let id = parse_or(arg, 0u32);
                if !self.invoice.remove_item(id) {
                    return Err(WidgetError::Invalid(format!("No line item with id {}", id)));
                }
            }
            "export" | "save" => {
                let done = self.export(ctx)?;
                return Ok(vec![done]);
            }
            "show" | "" => {}
            _ => return Err(WidgetError::UnknownCommand(cmd)),
        }
        Ok(vec![self.render()])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    // =========================================================================
    // Totals
    // =========================================================================

    #[test]
    fn test_new_invoice_has_one_item() {
        let invoice = Invoice::new();
        assert_eq!(invoice.items().len(), 1);
        assert_eq!(invoice.items()[0].quantity, 1);
        assert_eq!(invoice.total(), 0.0);
        assert!(invoice.number.starts_with("INV-"));
    }

    #[test]
    fn test_totals() {
        let mut invoice = Invoice::new();
        invoice.update_item(1, ItemField::Quantity, "3");
        invoice.update_item(1, ItemField::Price, "19.99");
        let second = invoice.add_item();
        invoice.update_item(second, ItemField::Price, "40");

        assert_eq!(money(invoice.subtotal()), "$99.97");
        assert_eq!(money(invoice.tax()), "$10.00");
        assert_eq!(money(invoice.total()), "$109.97");
    }

    #[test]
    fn test_ids_are_not_reused() {
        let mut invoice = Invoice::new();
        let second = invoice.add_item();
        assert!(invoice.remove_item(second));
        assert!(!invoice.remove_item(second));
        assert_eq!(invoice.add_item(), 3);
    }

    #[test]
    fn test_malformed_numbers_become_zero() {
        let mut invoice = Invoice::new();
        invoice.update_item(1, ItemField::Quantity, "lots");
        invoice.update_item(1, ItemField::Price, "cheap");
        assert_eq!(invoice.items()[0].quantity, 0);
        assert_eq!(invoice.items()[0].price, 0.0);
    }

    #[test]
    fn test_party_parse() {
        assert_eq!(
            Party::parse("Acme Ltd <billing@acme.test>"),
            Party {
                name: "Acme Ltd".to_string(),
                email: "billing@acme.test".to_string()
            }
        );
        assert_eq!(Party::parse("Jo, jo@x.test").email, "jo@x.test");
        assert_eq!(Party::parse("Solo").email, "");
    }

    // =========================================================================
    // Widget
    // =========================================================================

    #[tokio::test]
    async fn test_widget_set_and_remove() {
        let ctx = WidgetContext::new(".");
        let mut widget = InvoiceWidget::new();
        widget.handle("add Tutoring session", &ctx).await.unwrap();
        widget.handle("set 2 qty 2", &ctx).await.unwrap();
        widget.handle("set 2 price 25.5", &ctx).await.unwrap();
        widget.handle("remove 1", &ctx).await.unwrap();

        let invoice = widget.invoice();
        assert_eq!(invoice.items().len(), 1);
        assert_eq!(invoice.items()[0].description, "Tutoring session");
        assert_eq!(money(invoice.total()), "$56.10");

        assert!(matches!(
            widget.handle("set 9 qty 1", &ctx).await,
            Err(WidgetError::Invalid(_))
        ));
        assert!(matches!(
            widget.handle("set 2 colour red", &ctx).await,
            Err(WidgetError::Usage(_))
        ));
    }

    #[tokio::test]
    async fn test_widget_export() {
        let temp = TempDir::new().unwrap();
        let ctx = WidgetContext::new(temp.path());
        let mut widget = InvoiceWidget::new();
        widget.handle("vendor Acme <a@acme.test>", &ctx).await.unwrap();
        widget.handle("set 1 price 10", &ctx).await.unwrap();
        widget.handle("export", &ctx).await.unwrap();

        let saved: Vec<_> = fs::read_dir(temp.path())
            .unwrap()
            .map(|e| e.unwrap().path())
            .collect();
        assert_eq!(saved.len(), 1);
        let text = fs::read_to_string(&saved[0]).unwrap();
        assert!(text.contains("From: Acme <a@acme.test>"));
        assert!(text.contains("$11.00"));
    }
}
