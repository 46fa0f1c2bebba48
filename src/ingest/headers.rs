use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// 报价表中可识别的标准字段
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CanonicalField {
    ItemCode,
    UnitPrice,
    Currency,
    QuoteDate,
    LeadTime,
    PaymentTerms,
    DeliveryMethod,
    Notes,
    VatRate,
}

impl CanonicalField {
    pub fn is_required(&self) -> bool {
        matches!(self, CanonicalField::ItemCode | CanonicalField::UnitPrice)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            CanonicalField::ItemCode => "item_code",
            CanonicalField::UnitPrice => "unit_price",
            CanonicalField::Currency => "currency",
            CanonicalField::QuoteDate => "quote_date",
            CanonicalField::LeadTime => "lead_time",
            CanonicalField::PaymentTerms => "payment_terms",
            CanonicalField::DeliveryMethod => "delivery_method",
            CanonicalField::Notes => "notes",
            CanonicalField::VatRate => "vat_rate",
        }
    }
}

/// 声明式表头映射: 标准字段 -> 可接受的表头别名
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HeaderMapping {
    aliases: IndexMap<CanonicalField, Vec<String>>,
}

/// 表头解析结果
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HeaderResolution {
    /// 标准字段 -> 列下标
    pub columns: IndexMap<CanonicalField, usize>,
    pub unmatched_headers: Vec<String>,
    pub missing_required: Vec<CanonicalField>,
}

impl HeaderResolution {
    pub fn column(&self, field: CanonicalField) -> Option<usize> {
        self.columns.get(&field).copied()
    }

    pub fn is_complete(&self) -> bool {
        self.missing_required.is_empty()
    }
}

impl Default for HeaderMapping {
    fn default() -> Self {
        let table: [(CanonicalField, &[&str]); 9] = [
            (CanonicalField::ItemCode, &["ÜRÜN KODU", "STOK KODU", "MALZEME KODU", "SKU", "ITEM CODE"]),
            (CanonicalField::UnitPrice, &["BİRİM FİYAT", "TEKLİF FİYATI", "FİYAT", "UNIT PRICE", "PRICE"]),
            (CanonicalField::Currency, &["PARA BİRİMİ", "DÖVİZ", "CURRENCY"]),
            (CanonicalField::QuoteDate, &["TEKLİF TARİHİ", "TARİH", "QUOTE DATE", "DATE"]),
            (CanonicalField::LeadTime, &["TESLİMAT SÜRESİ", "TESLİM SÜRESİ", "TERMİN", "LEAD TIME"]),
            (CanonicalField::PaymentTerms, &["ÖDEME ŞEKLİ", "ÖDEME", "PAYMENT TERMS"]),
            (CanonicalField::DeliveryMethod, &["TESLİM ŞEKLİ", "DELIVERY METHOD"]),
            (CanonicalField::Notes, &["NOTLAR", "NOT", "AÇIKLAMA", "NOTES"]),
            (CanonicalField::VatRate, &["KDV ORANI", "KDV", "VAT"]),
        ];

        Self {
            aliases: table
                .iter()
                .map(|(field, aliases)| (*field, aliases.iter().map(|a| a.to_string()).collect()))
                .collect(),
        }
    }
}

impl HeaderMapping {
    pub fn new(aliases: IndexMap<CanonicalField, Vec<String>>) -> Self {
        Self { aliases }
    }

    /// 追加别名 (保留原有别名顺序)
    pub fn with_alias(mut self, field: CanonicalField, alias: impl Into<String>) -> Self {
        self.aliases.entry(field).or_default().push(alias.into());
        self
    }

    /// 解析表头，纯函数，与表格 I/O 无关
    ///
    /// 先精确匹配别名，再做包含匹配；一个表头最多对应一个字段，
    /// 一个字段最多占用一列 (先到先得)。
    pub fn resolve<S: AsRef<str>>(&self, headers: &[S]) -> HeaderResolution {
        let normalized: Vec<String> = headers.iter().map(|h| fold(h.as_ref())).collect();
        let folded_aliases: Vec<(CanonicalField, Vec<String>)> = self
            .aliases
            .iter()
            .map(|(field, aliases)| (*field, aliases.iter().map(|a| fold(a)).collect()))
            .collect();

        let mut columns: IndexMap<CanonicalField, usize> = IndexMap::new();
        let mut taken = vec![false; headers.len()];

        // 第一轮: 精确匹配
        for (field, aliases) in &folded_aliases {
            if let Some(idx) = (0..normalized.len())
                .find(|&i| !taken[i] && aliases.iter().any(|a| *a == normalized[i]))
            {
                columns.insert(*field, idx);
                taken[idx] = true;
            }
        }

        // 第二轮: 包含匹配
        for (field, aliases) in &folded_aliases {
            if columns.contains_key(field) {
                continue;
            }
            if let Some(idx) = (0..normalized.len()).find(|&i| {
                !taken[i]
                    && !normalized[i].is_empty()
                    && aliases.iter().any(|a| !a.is_empty() && normalized[i].contains(a.as_str()))
            }) {
                columns.insert(*field, idx);
                taken[idx] = true;
            }
        }

        columns.sort_by(|_, a, _, b| a.cmp(b));

        let unmatched_headers = headers
            .iter()
            .zip(&taken)
            .filter(|(h, taken)| !**taken && !h.as_ref().trim().is_empty())
            .map(|(h, _)| h.as_ref().to_string())
            .collect();

        let missing_required = folded_aliases
            .iter()
            .map(|(field, _)| *field)
            .filter(|f| f.is_required() && !columns.contains_key(f))
            .collect();

        HeaderResolution {
            columns,
            unmatched_headers,
            missing_required,
        }
    }
}

/// 表头归一化: 去首尾空白、小写、去掉土耳其语变音，
/// 使 "BİRİM FİYAT" 与 "Birim Fiyat"、"BIRIM FIYAT" 一致
fn fold(text: &str) -> String {
    text.trim()
        .to_lowercase()
        .chars()
        .filter(|c| *c != '\u{0307}')
        .map(|c| match c {
            'ı' => 'i',
            'ç' => 'c',
            'ğ' => 'g',
            'ö' => 'o',
            'ş' => 's',
            'ü' => 'u',
            other => other,
        })
        .collect::<String>()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}
