//! Demo data for a freshly created store.

use std::collections::HashSet;

use models::{Member, Merchant};
use rand::Rng;
use tracing::info;

use crate::errors::ServiceError;
use crate::merchant::repository::MerchantRepository;

const FIRST_NAMES: &[&str] = &[
    "alice", "bruno", "carla", "dmitri", "elena", "felix", "grace", "hiro", "ines", "jonas",
    "kira", "lucas", "maya", "nils", "olga", "pedro", "quinn", "rosa", "sami", "tara",
];
const LAST_NAMES: &[&str] = &[
    "adams", "berg", "costa", "dubois", "evans", "fischer", "garcia", "hansen", "ito", "jensen",
    "kowalski", "lopez", "moreau", "novak", "olsen", "petrov", "rossi", "silva", "tanaka", "weber",
];
const DOMAINS: &[&str] = &["example.com", "example.org", "example.net", "mail.test", "shop.test"];

#[derive(Clone, Copy, Debug)]
pub struct SeedPlan {
    pub merchants: usize,
    pub members_per_merchant: usize,
}

impl Default for SeedPlan {
    fn default() -> Self { Self { merchants: 5, members_per_merchant: 200 } }
}

/// Random, plausible-looking email address.
pub fn fake_email<R: Rng + ?Sized>(rng: &mut R) -> String {
    let first = FIRST_NAMES[rng.gen_range(0..FIRST_NAMES.len())];
    let last = LAST_NAMES[rng.gen_range(0..LAST_NAMES.len())];
    let domain = DOMAINS[rng.gen_range(0..DOMAINS.len())];
    format!("{first}.{last}{}@{domain}", rng.gen_range(0..1000))
}

/// Merchant with a generated code and `members` distinct fake emails.
pub fn fake_merchant(members: usize) -> Merchant {
    let mut rng = rand::thread_rng();
    let mut seen = HashSet::with_capacity(members);
    let mut merchant = Merchant::new(Merchant::generate_code());
    while merchant.members.len() < members {
        let email = fake_email(&mut rng);
        if seen.insert(email.clone()) {
            merchant.push_member(Member::new(email));
        }
    }
    merchant
}

/// Store `plan.merchants` generated merchants; returns their codes.
pub async fn seed<R: MerchantRepository + ?Sized>(repo: &R, plan: SeedPlan) -> Result<Vec<String>, ServiceError> {
    let mut codes = Vec::with_capacity(plan.merchants);
    for _ in 0..plan.merchants {
        let merchant = fake_merchant(plan.members_per_merchant);
        let stored = repo.insert_merchant(merchant).await?;
        codes.push(stored.code);
    }
    info!(merchants = plan.merchants, members_per_merchant = plan.members_per_merchant, "store seeded");
    Ok(codes)
}
