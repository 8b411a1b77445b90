use fake::Fake;
use fake::faker::address::{en as address_en, pt_br as address_pt_br, zh_cn as address_zh_cn};
use fake::faker::company::{en as company_en, pt_br as company_pt_br, zh_cn as company_zh_cn};
use fake::faker::name::{en as name_en, pt_br as name_pt_br, zh_cn as name_zh_cn};
use rand::RngCore;

use crate::errors::GenerationError;
use crate::faker_rs::locales::LocaleKey;

/// Locale-aware fake values backing the pooled semantic types.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FakerKind {
    PersonName,
    Company,
    City,
    Country,
}

impl FakerKind {
    pub fn id(self) -> &'static str {
        match self {
            Self::PersonName => "faker.name.Name",
            Self::Company => "faker.company.CompanyName",
            Self::City => "faker.address.CityName",
            Self::Country => "faker.address.CountryName",
        }
    }
}

pub struct FakeRsAdapter;

impl FakeRsAdapter {
    /// Resolve an optional locale string, falling back to the default locale.
    pub fn resolve_locale(locale: Option<&str>) -> Result<LocaleKey, GenerationError> {
        match locale {
            None => Ok(LocaleKey::default()),
            Some(value) => LocaleKey::parse(value)
                .ok_or_else(|| GenerationError::UnsupportedLocale(value.to_string())),
        }
    }

    pub fn generate_value(kind: FakerKind, locale: LocaleKey, rng: &mut dyn RngCore) -> String {
        match (kind, locale) {
            (FakerKind::PersonName, LocaleKey::EnUs) => name_en::Name().fake_with_rng(rng),
            (FakerKind::PersonName, LocaleKey::PtBr) => name_pt_br::Name().fake_with_rng(rng),
            (FakerKind::PersonName, LocaleKey::ZhCn) => name_zh_cn::Name().fake_with_rng(rng),
            (FakerKind::Company, LocaleKey::EnUs) => company_en::CompanyName().fake_with_rng(rng),
            (FakerKind::Company, LocaleKey::PtBr) => {
                company_pt_br::CompanyName().fake_with_rng(rng)
            }
            (FakerKind::Company, LocaleKey::ZhCn) => {
                company_zh_cn::CompanyName().fake_with_rng(rng)
            }
            (FakerKind::City, LocaleKey::EnUs) => address_en::CityName().fake_with_rng(rng),
            (FakerKind::City, LocaleKey::PtBr) => address_pt_br::CityName().fake_with_rng(rng),
            (FakerKind::City, LocaleKey::ZhCn) => address_zh_cn::CityName().fake_with_rng(rng),
            (FakerKind::Country, LocaleKey::EnUs) => address_en::CountryName().fake_with_rng(rng),
            (FakerKind::Country, LocaleKey::PtBr) => {
                address_pt_br::CountryName().fake_with_rng(rng)
            }
            (FakerKind::Country, LocaleKey::ZhCn) => {
                address_zh_cn::CountryName().fake_with_rng(rng)
            }
        }
    }
}
