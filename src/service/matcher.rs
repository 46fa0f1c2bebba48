use bigdecimal::{BigDecimal, Zero};
use indexmap::IndexSet;
use std::collections::{HashMap, HashSet};

use crate::error::{ComparisonError, Result, ValidationError};
use crate::models::{
    AggregateOptions, ComparisonRow, Diagnostic, DiagnosticKind, Item, MembershipTier, Quote,
    TierPolicy, Vendor,
};
use crate::service::{currency, validator};

/// 匹配阶段输出: 未填最优字段的比价行 + 被剔除报价的诊断
#[derive(Debug, Clone)]
pub struct MatchOutcome {
    pub rows: Vec<ComparisonRow>,
    pub diagnostics: Vec<Diagnostic>,
}

/// 按会员等级选出参与比价的供应商
///
/// 标准会员取调用方顺序的前 N 家，不重新排序。
pub fn select_vendors<'a>(vendors: &'a [Vendor], policy: &TierPolicy) -> &'a [Vendor] {
    match policy.membership_tier {
        MembershipTier::Standard => &vendors[..vendors.len().min(policy.max_vendors_standard)],
        MembershipTier::Premium => vendors,
    }
}

/// 将报价关联到需求明细，构建每个物料的 供应商 -> 报价 映射
pub fn match_quotes(
    items: &[Item],
    quotes: &[Quote],
    vendors: &[Vendor],
    policy: &TierPolicy,
    options: &AggregateOptions,
) -> Result<MatchOutcome> {
    // 1. 唯一性检查 (重复即输入歧义，始终致命)
    let item_index = index_items(items)?;
    let registered = index_vendors(vendors)?;
    check_duplicate_quotes(quotes)?;

    // 2. 按等级截取供应商
    let selected = select_vendors(vendors, policy);
    let selected_names: HashSet<&str> = selected.iter().map(|v| v.name.as_str()).collect();

    // 3. 校验并换算报价
    let mut accepted: HashMap<(&str, &str), Quote> = HashMap::new();
    let mut diagnostics = Vec::new();

    for quote in quotes {
        let Some(item) = item_index.get(quote.item_code.as_str()) else {
            tracing::debug!(
                "Quote {}/{} references unknown item, ignored",
                quote.vendor_name, quote.item_code
            );
            diagnostics.push(diagnostic(
                DiagnosticKind::UnmatchedItem,
                quote,
                format!("item '{}' is not part of this request", quote.item_code),
            ));
            continue;
        };

        if !registered.contains(quote.vendor_name.as_str()) {
            diagnostics.push(diagnostic(
                DiagnosticKind::UnknownVendor,
                quote,
                format!("vendor '{}' is not registered for this request", quote.vendor_name),
            ));
            continue;
        }

        if !selected_names.contains(quote.vendor_name.as_str()) {
            continue; // 被会员上限截掉的供应商
        }

        let errors = validator::validate(quote, item, &policy.exchange_rates);
        if !errors.is_empty() {
            if options.strict {
                return Err(strict_error(quote, errors));
            }
            for error in &errors {
                tracing::warn!(
                    "Excluding quote {}/{}: {}",
                    quote.vendor_name, quote.item_code, error
                );
                let kind = match error {
                    ValidationError::UnknownCurrency(_) => DiagnosticKind::UnknownCurrency,
                    _ => DiagnosticKind::Validation,
                };
                diagnostics.push(diagnostic(kind, quote, error.to_string()));
            }
            continue;
        }

        let total_in_base = match currency::to_base(&quote.total, &quote.currency, policy) {
            Ok(value) => value,
            Err(e) if options.strict => return Err(with_quote_context(e, quote)),
            Err(e) => {
                tracing::warn!("Excluding quote {}/{}: {}", quote.vendor_name, quote.item_code, e);
                diagnostics.push(diagnostic(DiagnosticKind::UnknownCurrency, quote, e.to_string()));
                continue;
            }
        };

        let mut priced = quote.clone();
        priced.total_in_base_currency = total_in_base;
        accepted.insert((quote.item_code.as_str(), quote.vendor_name.as_str()), priced);
    }

    // 没有任何报价暴露出的数量问题按物料单独记录
    for item in items {
        if item.quantity > BigDecimal::zero() {
            continue;
        }
        if diagnostics.iter().any(|d| d.item_code == item.item_code) {
            continue;
        }
        let error = ValidationError::NonPositiveQuantity(item.quantity.clone());
        if options.strict {
            return Err(ComparisonError::Validation {
                item_code: item.item_code.clone(),
                vendor_name: String::new(),
                errors: vec![error],
            });
        }
        tracing::warn!("Item {} cannot be priced: {}", item.item_code, error);
        diagnostics.push(Diagnostic {
            kind: DiagnosticKind::Validation,
            item_code: item.item_code.clone(),
            vendor_name: String::new(),
            message: error.to_string(),
        });
    }

    // 4. 按需求顺序生成比价行，供应商按入选顺序排列
    let rows = items
        .iter()
        .enumerate()
        .map(|(idx, item)| {
            let mut row = ComparisonRow::from_item(idx + 1, item);
            for vendor in selected {
                let key = (item.item_code.as_str(), vendor.name.as_str());
                if let Some(quote) = accepted.remove(&key) {
                    row.vendor_offers.insert(vendor.name.clone(), quote);
                }
            }
            row
        })
        .collect();

    Ok(MatchOutcome { rows, diagnostics })
}

fn index_items(items: &[Item]) -> Result<HashMap<&str, &Item>> {
    let mut index = HashMap::with_capacity(items.len());
    for item in items {
        if index.insert(item.item_code.as_str(), item).is_some() {
            return Err(ComparisonError::DuplicateItem {
                item_code: item.item_code.clone(),
            });
        }
    }
    Ok(index)
}

fn index_vendors(vendors: &[Vendor]) -> Result<IndexSet<&str>> {
    let mut names = IndexSet::with_capacity(vendors.len());
    for vendor in vendors {
        if !names.insert(vendor.name.as_str()) {
            return Err(ComparisonError::DuplicateVendor {
                vendor_name: vendor.name.clone(),
            });
        }
    }
    Ok(names)
}

fn check_duplicate_quotes(quotes: &[Quote]) -> Result<()> {
    let mut seen: HashSet<(&str, &str)> = HashSet::with_capacity(quotes.len());
    for quote in quotes {
        if !seen.insert((quote.item_code.as_str(), quote.vendor_name.as_str())) {
            return Err(ComparisonError::DuplicateQuote {
                item_code: quote.item_code.clone(),
                vendor_name: quote.vendor_name.clone(),
            });
        }
    }
    Ok(())
}

fn strict_error(quote: &Quote, errors: Vec<ValidationError>) -> ComparisonError {
    let unknown_currency = errors.iter().find_map(|e| match e {
        ValidationError::UnknownCurrency(code) => Some(code.clone()),
        _ => None,
    });

    match unknown_currency {
        Some(currency) => ComparisonError::UnknownCurrency {
            currency,
            item_code: Some(quote.item_code.clone()),
            vendor_name: Some(quote.vendor_name.clone()),
        },
        None => ComparisonError::Validation {
            item_code: quote.item_code.clone(),
            vendor_name: quote.vendor_name.clone(),
            errors,
        },
    }
}

fn with_quote_context(error: ComparisonError, quote: &Quote) -> ComparisonError {
    match error {
        ComparisonError::UnknownCurrency { currency, .. } => ComparisonError::UnknownCurrency {
            currency,
            item_code: Some(quote.item_code.clone()),
            vendor_name: Some(quote.vendor_name.clone()),
        },
        other => other,
    }
}

fn diagnostic(kind: DiagnosticKind, quote: &Quote, message: String) -> Diagnostic {
    Diagnostic {
        kind,
        item_code: quote.item_code.clone(),
        vendor_name: quote.vendor_name.clone(),
        message,
    }
}
