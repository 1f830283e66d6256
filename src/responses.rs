//! Canned replies picked by keyword matching

use once_cell::sync::Lazy;

/// Which canned reply a piece of input resolves to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Topic {
    BuyerQualification,
    MarketAnalysis,
    Scheduling,
    Capabilities,
}

/// One row of the decision table
#[derive(Debug, Clone)]
pub struct ResponseRule {
    pub topic: Topic,
    /// Lower-case keywords, any one of which selects this rule
    pub keywords: Vec<&'static str>,
    pub response: &'static str,
}

impl ResponseRule {
    pub fn new(topic: Topic, keywords: &[&'static str], response: &'static str) -> Self {
        Self {
            topic,
            keywords: keywords.to_vec(),
            response,
        }
    }

    fn matches(&self, lowered: &str) -> bool {
        self.keywords.iter().any(|keyword| lowered.contains(keyword))
    }
}

/// Ordered rules; the first match wins, otherwise the fallback is used
#[derive(Debug, Clone)]
pub struct ResponseSelector {
    rules: Vec<ResponseRule>,
    fallback: ResponseRule,
}

impl ResponseSelector {
    pub fn new(fallback: ResponseRule) -> Self {
        Self {
            rules: Vec::new(),
            fallback,
        }
    }

    /// Append a rule after the existing ones
    pub fn with_rule(mut self, rule: ResponseRule) -> Self {
        self.rules.push(rule);
        self
    }

    fn rule_for(&self, input: &str) -> &ResponseRule {
        let lowered = input.to_lowercase();
        self.rules
            .iter()
            .find(|rule| rule.matches(&lowered))
            .unwrap_or(&self.fallback)
    }

    pub fn select(&self, input: &str) -> &'static str {
        self.rule_for(input).response
    }

    pub fn classify(&self, input: &str) -> Topic {
        self.rule_for(input).topic
    }
}

impl Default for ResponseSelector {
    fn default() -> Self {
        ResponseSelector::new(ResponseRule::new(Topic::Capabilities, &[], CAPABILITIES))
            .with_rule(ResponseRule::new(
                Topic::BuyerQualification,
                &["qualify", "buyer"],
                BUYER_QUALIFICATION,
            ))
            .with_rule(ResponseRule::new(
                Topic::MarketAnalysis,
                &["market", "price"],
                MARKET_ANALYSIS,
            ))
            .with_rule(ResponseRule::new(
                Topic::Scheduling,
                &["schedule", "showing"],
                SCHEDULING,
            ))
    }
}

static DEFAULT_SELECTOR: Lazy<ResponseSelector> = Lazy::new(ResponseSelector::default);

/// Pick the canned reply for `input` using the built-in table
pub fn select_response(input: &str) -> &'static str {
    DEFAULT_SELECTOR.select(input)
}

pub fn classify(input: &str) -> Topic {
    DEFAULT_SELECTOR.classify(input)
}

const BUYER_QUALIFICATION: &str = "Here are key buyer qualification questions:

1. **Financial Readiness**
   - What's your budget range?
   - Are you pre-approved for a mortgage?
   - How much do you have for a down payment?

2. **Timeline**
   - When are you looking to move?
   - Is this urgent or flexible?

3. **Must-Haves**
   - How many bedrooms/bathrooms?
   - Preferred neighborhoods?
   - School district requirements?

4. **Current Situation**
   - Do you need to sell first?
   - Are you a first-time buyer?

Would you like me to create a follow-up email template for this lead?";

const MARKET_ANALYSIS: &str = "I can help with market analysis. For accurate pricing, I'd need:

• Property address and details
• Recent comparable sales (within 0.5 miles, last 90 days)
• Current market conditions in the area
• Unique features or upgrades

**Current Market Insights:**
- Average days on market in most areas: 25-35 days
- Well-priced homes are receiving multiple offers
- Buyers are focused on move-in ready properties
- Updated kitchens and bathrooms add 5-10% value

Would you like me to draft a CMA (Comparative Market Analysis) report template?";

const SCHEDULING: &str = "I can help you manage showings efficiently:

**Best Practices for Scheduling:**
1. Confirm availability within 2 hours of request
2. Bundle showings in the same area to save time
3. Allow 30-45 minutes per property
4. Send confirmation texts 2 hours before

**Sample Response Template:**
\"Thank you for your interest! I have availability for a showing at [Property Address] on:
- [Day] at [Time]
- [Day] at [Time]

Please let me know which works best, and I'll send you a calendar invite with directions.\"

Would you like me to create a showing checklist?";

const CAPABILITIES: &str = "I'm here to help with your real estate needs! I can assist with:

• Writing listing descriptions
• Qualifying potential buyers
• Market analysis and pricing
• Scheduling and coordination
• Client follow-up emails
• Neighborhood information
• Open house planning
• Social media content

What specific task can I help you with today?";
