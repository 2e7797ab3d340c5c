use crate::domain::constituent::Constituent;
use rust_decimal::Decimal;
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

/// Sortable column of the constituents table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SortField {
    Code,
    Name,
    Currency,
    MarketCap,
    NetChange,
    PercentualChange,
}

impl SortField {
    /// Column header label as shown on the site.
    pub fn label(&self) -> &'static str {
        match self {
            SortField::Code => "Code",
            SortField::Name => "Name",
            SortField::Currency => "Cur",
            SortField::MarketCap => "Market cap (m)",
            SortField::NetChange => "Change",
            SortField::PercentualChange => "Change %",
        }
    }

    /// Field name used by the components refresh API.
    pub fn api_key(&self) -> &'static str {
        match self {
            SortField::Code => "tidm",
            SortField::Name => "issuername",
            SortField::Currency => "currency",
            SortField::MarketCap => "marketcapitalization",
            SortField::NetChange => "netchange",
            SortField::PercentualChange => "percentualchange",
        }
    }

    fn is_numeric(&self) -> bool {
        matches!(
            self,
            SortField::MarketCap | SortField::NetChange | SortField::PercentualChange
        )
    }

    fn numeric(&self, c: &Constituent) -> Option<Decimal> {
        match self {
            SortField::MarketCap => c.market_cap_value(),
            SortField::NetChange => c.net_change_value(),
            SortField::PercentualChange => c.percent_change_value(),
            _ => None,
        }
    }

    fn text<'a>(&self, c: &'a Constituent) -> &'a str {
        match self {
            SortField::Code => &c.code,
            SortField::Name => &c.name,
            SortField::Currency => &c.currency,
            SortField::MarketCap => &c.market_cap,
            SortField::NetChange => &c.net_change,
            SortField::PercentualChange => &c.percentual_change,
        }
    }
}

impl FromStr for SortField {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().replace(['_', '-', ' '], "").as_str() {
            "code" | "tidm" => Ok(SortField::Code),
            "name" | "issuername" => Ok(SortField::Name),
            "currency" | "cur" => Ok(SortField::Currency),
            "marketcap" | "marketcapitalization" => Ok(SortField::MarketCap),
            "netchange" | "change" => Ok(SortField::NetChange),
            "percentualchange" | "percentchange" | "change%" => Ok(SortField::PercentualChange),
            _ => anyhow::bail!("Invalid sort field: {}", s),
        }
    }
}

impl fmt::Display for SortField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SortDirection {
    Ascending,
    Descending,
}

impl SortDirection {
    pub fn from_ascending(ascending: bool) -> Self {
        if ascending {
            SortDirection::Ascending
        } else {
            SortDirection::Descending
        }
    }

    /// Sort menu entry as shown on the site.
    pub fn label(&self) -> &'static str {
        match self {
            SortDirection::Ascending => "Lowest – highest",
            SortDirection::Descending => "Highest – lowest",
        }
    }

    pub fn api_key(&self) -> &'static str {
        match self {
            SortDirection::Ascending => "asc",
            SortDirection::Descending => "desc",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SortSpec {
    pub field: SortField,
    pub direction: SortDirection,
}

impl SortSpec {
    pub fn new(field: SortField, direction: SortDirection) -> Self {
        Self { field, direction }
    }

    /// Compare two rows under this spec. Numeric columns compare by value and
    /// unparsable cells always sort last, whatever the direction.
    pub fn compare(&self, a: &Constituent, b: &Constituent) -> Ordering {
        if self.field.is_numeric() {
            match (self.field.numeric(a), self.field.numeric(b)) {
                (Some(x), Some(y)) => self.directed(x.cmp(&y)),
                (Some(_), None) => Ordering::Less,
                (None, Some(_)) => Ordering::Greater,
                (None, None) => Ordering::Equal,
            }
        } else {
            self.directed(self.field.text(a).cmp(self.field.text(b)))
        }
    }

    /// Stable in-place sort.
    pub fn sort(&self, rows: &mut [Constituent]) {
        rows.sort_by(|a, b| self.compare(a, b));
    }

    pub fn is_sorted(&self, rows: &[Constituent]) -> bool {
        rows.windows(2)
            .all(|w| self.compare(&w[0], &w[1]) != Ordering::Greater)
    }

    fn directed(&self, ord: Ordering) -> Ordering {
        match self.direction {
            SortDirection::Ascending => ord,
            SortDirection::Descending => ord.reverse(),
        }
    }
}
