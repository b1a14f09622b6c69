use bigdecimal::BigDecimal;
use chrono::NaiveDate;

/// A price override attached to an item.
///
/// A rule either fixes the selling `rate` outright or takes a
/// `discount_percentage` off the list rate. When both are set the fixed rate
/// wins.
#[derive(Debug, Clone)]
pub struct PricingRule {
    pub item_code: String,
    pub rate: Option<BigDecimal>,
    pub discount_percentage: Option<BigDecimal>,
    pub priority: i32,
    pub disabled: bool,
    pub valid_from: Option<NaiveDate>,
    pub valid_upto: Option<NaiveDate>,
}

impl PricingRule {
    pub fn applies_on(&self, day: NaiveDate) -> bool {
        !self.disabled
            && self.valid_from.is_none_or(|from| from <= day)
            && self.valid_upto.is_none_or(|upto| day <= upto)
    }
}

/// Resolved selling price of an item.
#[derive(Debug, Clone, PartialEq)]
pub struct PriceQuote {
    /// Price the customer pays.
    pub price_list_rate: Option<BigDecimal>,
    /// Original list price, shown struck through. Only set when it differs
    /// from `price_list_rate`.
    pub slashed_rate: Option<BigDecimal>,
}

impl PriceQuote {
    pub fn unpriced() -> Self {
        Self {
            price_list_rate: None,
            slashed_rate: None,
        }
    }
}

/// Picks the enabled rule valid on `day` with the highest priority. Ties keep
/// the first rule seen.
pub fn applicable_rule(rules: &[PricingRule], day: NaiveDate) -> Option<&PricingRule> {
    rules
        .iter()
        .filter(|r| r.applies_on(day))
        .fold(None, |best: Option<&PricingRule>, r| match best {
            Some(b) if b.priority >= r.priority => Some(b),
            _ => Some(r),
        })
}

pub fn resolve_price(
    list_rate: Option<&BigDecimal>,
    rules: &[PricingRule],
    day: NaiveDate,
) -> PriceQuote {
    let rule = applicable_rule(rules, day);

    let resolved = match (rule, list_rate) {
        (Some(PricingRule { rate: Some(rate), .. }), _) => Some(rate.clone()),
        (
            Some(PricingRule {
                discount_percentage: Some(pct),
                ..
            }),
            Some(list),
        ) => Some(apply_discount(list, pct)),
        (_, Some(list)) => Some(list.clone()),
        (_, None) => None,
    };

    let Some(resolved) = resolved else {
        return PriceQuote::unpriced();
    };

    let slashed_rate = list_rate.filter(|list| **list != resolved).cloned();

    PriceQuote {
        price_list_rate: Some(resolved),
        slashed_rate,
    }
}

fn apply_discount(list: &BigDecimal, pct: &BigDecimal) -> BigDecimal {
    let hundred = BigDecimal::from(100);
    let pct = pct.clone().clamp(BigDecimal::from(0), hundred.clone());
    (list * (&hundred - pct) / hundred).round(2)
}
