//! Built-in catalog data: a representative set of small-business verticals.

use std::collections::BTreeMap;

use crate::domain::catalog::{
    BehaviorBundle, FeatureDefinition, FeaturePriority, KitKnowledge, SmartQuestion,
};
use crate::domain::discovery::heuristics::GENERAL_INDUSTRY;
use crate::domain::discovery::SlotName;

use super::static_catalog::CatalogData;

/// User-facing one-liners shared by every kit.
const FEATURE_DESCRIPTIONS: &[(&str, &str)] = &[
    ("scheduling", "Shared calendar for jobs and appointments"),
    ("online_booking", "Customers book open slots themselves"),
    ("invoicing", "Create and send invoices"),
    ("payments", "Take card payments and deposits"),
    ("quoting", "Send quotes and estimates for approval"),
    ("customer_management", "Customer records with contact details and history"),
    ("job_tracking", "Track each job from request to done"),
    ("dispatch", "Assign jobs to technicians and plan routes"),
    ("inventory", "Track parts, products and supplies"),
    ("reminders", "Automatic text and email reminders"),
    ("reviews", "Ask happy customers for reviews"),
    ("reporting", "Revenue and activity reports"),
    ("vehicle_history", "Service history for every vehicle"),
    ("property_listings", "Manage listings and showings"),
    ("lead_tracking", "Follow up with leads and prospects"),
    ("client_portal", "A portal where clients see their documents"),
    ("tenant_portal", "Tenants pay rent and send requests online"),
    ("maintenance_requests", "Log and assign maintenance requests"),
    ("rent_collection", "Collect rent and track who has paid"),
    ("menu_management", "Keep the menu and specials up to date"),
    ("online_ordering", "Pickup and delivery orders online"),
    ("memberships", "Sell memberships, packages and subscriptions"),
    ("class_schedule", "Publish a class timetable with sign-ups"),
    ("progress_tracking", "Track client goals and progress"),
    ("recurring_services", "Repeat visits on a weekly or monthly plan"),
    ("staff_management", "Staff schedules, shifts and assignments"),
    ("photo_gallery", "Share galleries for proofing and download"),
    ("contracts", "Send contracts and collect signatures"),
    ("permit_tracking", "Track permits and inspections per job"),
    ("time_tracking", "Timesheets and hours worked"),
];

fn feature(id: &str, keywords: &[&str]) -> FeatureDefinition {
    FeatureDefinition::new(id, keywords)
}

pub(super) fn features() -> Vec<FeatureDefinition> {
    use FeaturePriority::*;

    vec![
        feature("scheduling", &["schedule", "appointment", "calendar", "booking"])
            .with_intents(&["scheduling"])
            .with_priority(Important),
        feature("online_booking", &["book online", "online booking", "booking page", "self booking"])
            .with_intents(&["scheduling", "online_presence"])
            .with_dependencies(&["scheduling"]),
        feature("invoicing", &["invoice", "billing", "bill"])
            .with_intents(&["invoicing"])
            .with_priority(Essential),
        feature("payments", &["payment", "card", "deposit", "checkout", "get paid"])
            .with_intents(&["payments"])
            .with_dependencies(&["invoicing"])
            .with_priority(Important),
        feature("quoting", &["quote", "estimate", "proposal"])
            .with_intents(&["quoting"])
            .with_industries(&["plumber", "electrician", "hvac", "landscaping", "auto_repair"]),
        feature("customer_management", &["customer", "client", "contact list", "crm"])
            .with_intents(&["customer_management"])
            .with_priority(Important),
        feature("job_tracking", &["job", "work order", "job status"])
            .with_industries(&["plumber", "electrician", "hvac", "cleaning", "landscaping"]),
        feature("dispatch", &["dispatch", "route", "technician", "emergency", "on call"])
            .with_intents(&["dispatch"])
            .with_dependencies(&["scheduling"])
            .with_industries(&["plumber", "electrician", "hvac"]),
        feature("inventory", &["inventory", "stock", "parts", "supplies", "products"])
            .with_intents(&["inventory"]),
        feature("reminders", &["reminder", "remind", "sms", "text message", "notification"])
            .with_intents(&["communication"]),
        feature("reviews", &["review", "ratings", "testimonial"]).with_intents(&["marketing"]),
        feature("reporting", &["report", "analytics", "dashboard", "revenue"])
            .with_intents(&["reporting"]),
        feature("vehicle_history", &["vehicle", "car repair", "service history", "mileage", "make and model"])
            .with_industries(&["auto_repair"]),
        feature("property_listings", &["listing", "showing", "open house", "mls"])
            .with_industries(&["realtor"]),
        feature("lead_tracking", &["leads", "lead tracking", "prospect", "follow up"])
            .with_industries(&["realtor"]),
        feature("client_portal", &["client portal", "customer portal", "document sharing"])
            .with_dependencies(&["customer_management"]),
        feature("tenant_portal", &["tenant portal", "tenant", "leases"])
            .with_industries(&["property_manager"]),
        feature("maintenance_requests", &["maintenance request", "work request", "repair request"])
            .with_industries(&["property_manager"]),
        feature("rent_collection", &["rent collection", "collect rent", "rent payment", "rent roll"])
            .with_dependencies(&["payments"])
            .with_industries(&["property_manager"]),
        feature("menu_management", &["menu", "dishes", "specials"])
            .with_industries(&["restaurant"]),
        feature("online_ordering", &["online order", "takeout", "pickup order", "delivery"])
            .with_dependencies(&["payments"])
            .with_industries(&["restaurant"]),
        feature("memberships", &["membership", "members", "package", "subscription"])
            .with_dependencies(&["payments"])
            .with_industries(&["gym", "personal_trainer"]),
        feature("class_schedule", &["classes", "class schedule", "timetable"])
            .with_dependencies(&["scheduling"])
            .with_industries(&["gym"]),
        feature("progress_tracking", &["progress", "workout", "measurements", "goals"])
            .with_industries(&["personal_trainer"]),
        feature("recurring_services", &["recurring", "weekly", "monthly service", "maintenance plan"])
            .with_industries(&["cleaning", "landscaping", "hvac"]),
        feature("staff_management", &["staff", "employee", "crew", "shift", "team members"]),
        feature("photo_gallery", &["gallery", "portfolio", "photo", "proofing"])
            .with_intents(&["online_presence"])
            .with_industries(&["photographer"]),
        feature("contracts", &["contracts", "agreement", "signature", "e-sign"]),
        feature("permit_tracking", &["permit", "inspection", "code compliance"])
            .with_industries(&["electrician"]),
        feature("time_tracking", &["timesheet", "time tracking", "clock in", "hours worked"]),
    ]
}

pub(super) fn bundles() -> Vec<BehaviorBundle> {
    vec![
        BehaviorBundle::new(
            "home_services",
            &["plumber", "plumbing", "electrician", "hvac", "handyman", "repair", "emergency"],
            7,
        )
        .with_industries(&["plumber", "electrician", "hvac"])
        .with_features(&["scheduling", "job_tracking", "dispatch", "quoting", "invoicing"])
        .with_entities(&["customer", "job", "quote", "invoice"])
        .with_workflows(&["request_to_job", "quote_approval", "job_to_invoice"]),
        BehaviorBundle::new("auto_shop", &["mechanic", "auto repair", "car repair", "garage", "oil change"], 8)
            .with_industries(&["auto_repair"])
            .with_features(&["vehicle_history", "quoting", "inventory", "invoicing"])
            .with_entities(&["customer", "vehicle", "work_order", "invoice"])
            .with_workflows(&["estimate_approval", "work_order_to_invoice"]),
        BehaviorBundle::new("real_estate_agency", &["realtor", "real estate", "listing", "buyers", "sellers"], 8)
            .with_industries(&["realtor"])
            .with_features(&["property_listings", "lead_tracking", "client_portal", "scheduling"])
            .with_entities(&["listing", "lead", "client", "showing"])
            .with_workflows(&["lead_to_client", "listing_to_close"]),
        BehaviorBundle::new("property_management", &["landlord", "property manager", "tenant", "units", "rent"], 8)
            .with_industries(&["property_manager"])
            .with_features(&["tenant_portal", "maintenance_requests", "rent_collection", "payments"])
            .with_entities(&["property", "unit", "tenant", "lease"])
            .with_workflows(&["rent_cycle", "maintenance_request_to_fix"]),
        BehaviorBundle::new("salon_spa", &["salon", "stylist", "barber", "spa", "nails"], 7)
            .with_industries(&["salon"])
            .with_features(&["online_booking", "scheduling", "reminders", "inventory"])
            .with_entities(&["client", "appointment", "stylist", "service"])
            .with_workflows(&["booking_to_visit", "rebooking"]),
        BehaviorBundle::new("restaurant", &["restaurant", "cafe", "menu", "takeout", "diner"], 7)
            .with_industries(&["restaurant"])
            .with_features(&["menu_management", "online_ordering", "payments", "staff_management"])
            .with_entities(&["order", "menu_item", "table", "staff"])
            .with_workflows(&["order_to_fulfillment", "shift_planning"]),
        BehaviorBundle::new("fitness_studio", &["gym", "studio", "classes", "members", "yoga"], 7)
            .with_industries(&["gym"])
            .with_features(&["memberships", "class_schedule", "payments", "reminders"])
            .with_entities(&["member", "class", "membership", "instructor"])
            .with_workflows(&["signup_to_member", "class_booking"]),
        BehaviorBundle::new("personal_training", &["trainer", "personal training", "coaching", "workout"], 8)
            .with_industries(&["personal_trainer"])
            .with_features(&["online_booking", "progress_tracking", "memberships", "payments"])
            .with_entities(&["client", "session", "package", "goal"])
            .with_workflows(&["intake_to_plan", "session_booking"]),
        BehaviorBundle::new("cleaning_service", &["cleaning", "cleaner", "maid", "janitorial"], 7)
            .with_industries(&["cleaning"])
            .with_features(&["recurring_services", "scheduling", "staff_management", "invoicing"])
            .with_entities(&["customer", "visit", "crew", "invoice"])
            .with_workflows(&["recurring_visit", "visit_to_invoice"]),
        BehaviorBundle::new("landscaping_service", &["landscaping", "lawn", "mowing", "gardening"], 7)
            .with_industries(&["landscaping"])
            .with_features(&["recurring_services", "quoting", "job_tracking", "invoicing"])
            .with_entities(&["customer", "property", "job", "quote"])
            .with_workflows(&["quote_to_job", "seasonal_plan"]),
        BehaviorBundle::new("photography_studio", &["photographer", "photography", "photo shoot", "wedding"], 8)
            .with_industries(&["photographer"])
            .with_features(&["photo_gallery", "contracts", "payments", "scheduling"])
            .with_entities(&["client", "shoot", "gallery", "contract"])
            .with_workflows(&["inquiry_to_booking", "shoot_to_delivery"]),
        BehaviorBundle::new("service_business", &["business", "customers", "clients", "services"], 2)
            .with_features(&["customer_management", "scheduling", "invoicing"])
            .with_entities(&["customer", "appointment", "invoice"])
            .with_workflows(&["booking_to_invoice"]),
    ]
}

fn q(id: &str, prompt: &str, purpose: &str) -> SmartQuestion {
    SmartQuestion::new(id, prompt, purpose)
}

fn team_size(prompt: &str) -> SmartQuestion {
    q("team_size", prompt, "Sizes the app: solo owners skip staff features").filling(SlotName::TeamSize)
}

fn tools() -> SmartQuestion {
    q(
        "tools",
        "Are there tools you already use that it should work with, like QuickBooks or Google Calendar?",
        "Finds integrations to connect",
    )
    .filling(SlotName::Integrations)
}

fn kit(
    industry: &str,
    label: &str,
    questions: Vec<SmartQuestion>,
    core: &[&str],
    optional: &[&str],
) -> KitKnowledge {
    let feature_descriptions: BTreeMap<String, String> = FEATURE_DESCRIPTIONS
        .iter()
        .filter(|(id, _)| core.contains(id) || optional.contains(id))
        .map(|(id, text)| (id.to_string(), text.to_string()))
        .collect();

    KitKnowledge {
        industry: industry.to_string(),
        label: label.to_string(),
        questions,
        core_features: core.iter().map(|f| f.to_string()).collect(),
        optional_features: optional.iter().map(|f| f.to_string()).collect(),
        feature_descriptions,
        sub_verticals: Vec::new(),
    }
}

pub(super) fn kits() -> Vec<KitKnowledge> {
    vec![
        kit(
            GENERAL_INDUSTRY,
            "General business",
            vec![
                team_size("How many people work in the business, including you?"),
                q(
                    "customer_facing",
                    "Will your customers use the app themselves, or is it just for you and your team?",
                    "Decides whether to build customer-facing screens",
                )
                .filling(SlotName::CustomerFacing),
                q(
                    "main_records",
                    "What do you need to keep track of most: customers, jobs, orders or something else?",
                    "Finds the primary entities",
                )
                .filling(SlotName::PrimaryEntities),
                q("billing", "Do you want to send invoices or take payments in the app?", "Money flow")
                    .enabling(&["invoicing", "payments"]),
                tools(),
            ],
            &["customer_management"],
            &["scheduling", "invoicing", "payments", "reminders", "reporting"],
        ),
        kit(
            "plumber",
            "Plumbing",
            vec![
                team_size("Do you work solo, or do you have a crew?"),
                q(
                    "emergency_calls",
                    "Do you take emergency call-outs, or mostly scheduled jobs?",
                    "Emergency work needs dispatch",
                )
                .enabling(&["dispatch"]),
                q(
                    "online_booking",
                    "Should customers be able to book a visit online?",
                    "Customer-facing booking",
                )
                .filling(SlotName::CustomerFacing)
                .enabling(&["online_booking"]),
                q("quotes", "Do you send quotes before starting a job?", "Quote approval flow")
                    .enabling(&["quoting"]),
                tools(),
            ],
            &["scheduling", "job_tracking", "invoicing"],
            &["dispatch", "online_booking", "quoting", "payments", "reminders", "inventory"],
        ),
        kit(
            "electrician",
            "Electrical contracting",
            vec![
                team_size("Is it just you, or do you have other electricians working with you?"),
                q(
                    "permits",
                    "Do you need to track permits and inspections for your jobs?",
                    "Compliance tracking",
                )
                .enabling(&["permit_tracking"]),
                q(
                    "work_mix",
                    "Is your work mostly residential, commercial, or both?",
                    "Gauges job complexity",
                )
                .filling(SlotName::Complexity),
                q(
                    "customer_updates",
                    "Should customers get updates or approve quotes from their phone?",
                    "Customer-facing approvals",
                )
                .filling(SlotName::CustomerFacing)
                .enabling(&["quoting", "reminders"]),
                tools(),
            ],
            &["scheduling", "job_tracking", "invoicing"],
            &["permit_tracking", "quoting", "dispatch", "payments", "reminders"],
        ),
        kit(
            "hvac",
            "Heating and cooling",
            vec![
                team_size("How many technicians are on your team?"),
                q(
                    "maintenance_plans",
                    "Do you sell maintenance plans or recurring service visits?",
                    "Recurring revenue",
                )
                .enabling(&["recurring_services"]),
                q(
                    "dispatching",
                    "Do you need to send techs to jobs and plan their routes?",
                    "Dispatch board",
                )
                .enabling(&["dispatch"]),
                q(
                    "online_booking",
                    "Should customers be able to book service online?",
                    "Customer-facing booking",
                )
                .filling(SlotName::CustomerFacing)
                .enabling(&["online_booking"]),
                tools(),
            ],
            &["scheduling", "job_tracking", "invoicing"],
            &["recurring_services", "dispatch", "online_booking", "inventory", "payments"],
        ),
        kit(
            "auto_repair",
            "Auto repair",
            vec![
                team_size("How many mechanics work in the shop?"),
                q(
                    "vehicle_history",
                    "Do you want to keep a service history for each vehicle?",
                    "Vehicle records",
                )
                .enabling(&["vehicle_history"]),
                q(
                    "estimate_approval",
                    "Should customers approve estimates by text or email?",
                    "Customer-facing approvals",
                )
                .filling(SlotName::CustomerFacing)
                .enabling(&["quoting", "reminders"]),
                q("parts", "Do you need to track parts inventory?", "Parts stock").enabling(&["inventory"]),
                tools(),
            ],
            &["customer_management", "vehicle_history", "invoicing"],
            &["quoting", "inventory", "reminders", "payments", "scheduling"],
        ),
        kit(
            "realtor",
            "Real estate agent",
            vec![
                team_size("Do you work on your own, or as part of a team or brokerage?"),
                q("listings", "Do you want to manage your listings and showings here?", "Listing pipeline")
                    .enabling(&["property_listings"]),
                q("leads", "Do you need help following up with leads?", "Lead pipeline")
                    .enabling(&["lead_tracking"]),
                q(
                    "client_portal",
                    "Should clients be able to log in and see documents and updates?",
                    "Customer-facing portal",
                )
                .filling(SlotName::CustomerFacing)
                .enabling(&["client_portal"]),
                tools(),
            ],
            &["customer_management", "property_listings", "lead_tracking"],
            &["client_portal", "scheduling", "contracts", "reminders"],
        ),
        kit(
            "property_manager",
            "Property management",
            vec![
                team_size("How many people help you manage the properties?"),
                q(
                    "portfolio_size",
                    "Roughly how many units or properties do you manage?",
                    "Portfolio scale",
                )
                .filling(SlotName::Complexity),
                q(
                    "tenant_portal",
                    "Should tenants be able to pay rent and send requests online?",
                    "Customer-facing portal",
                )
                .filling(SlotName::CustomerFacing)
                .enabling(&["tenant_portal", "rent_collection"]),
                q(
                    "maintenance",
                    "Do you want to track maintenance requests and who is fixing them?",
                    "Maintenance workflow",
                )
                .enabling(&["maintenance_requests"]),
                tools(),
            ],
            &["tenant_portal", "maintenance_requests", "rent_collection", "payments", "invoicing"],
            &["reporting", "contracts", "reminders"],
        ),
        kit(
            "salon",
            "Salon and barbershop",
            vec![
                team_size("How many stylists or barbers work with you?"),
                q(
                    "online_booking",
                    "Should clients book appointments online?",
                    "Customer-facing booking",
                )
                .filling(SlotName::CustomerFacing)
                .enabling(&["online_booking"]),
                q("reminders", "Do you want automatic appointment reminders?", "No-show reduction")
                    .enabling(&["reminders"]),
                q("retail", "Do you sell products and need to track stock?", "Retail inventory")
                    .enabling(&["inventory"]),
                tools(),
            ],
            &["scheduling", "customer_management"],
            &["online_booking", "reminders", "inventory", "payments", "reviews"],
        ),
        kit(
            "restaurant",
            "Restaurant",
            vec![
                team_size("How many staff do you have, front and back of house?"),
                q(
                    "online_ordering",
                    "Do you want customers to order online for pickup or delivery?",
                    "Customer-facing ordering",
                )
                .filling(SlotName::CustomerFacing)
                .enabling(&["online_ordering", "payments", "invoicing"]),
                q("menu", "How often does your menu change?", "Menu management")
                    .enabling(&["menu_management"]),
                q("shifts", "Do you need to schedule staff shifts?", "Staff scheduling")
                    .enabling(&["staff_management"]),
                tools(),
            ],
            &["menu_management"],
            &["online_ordering", "payments", "staff_management", "inventory", "reviews"],
        ),
        kit(
            "personal_trainer",
            "Personal training",
            vec![
                team_size("Do you train clients on your own, or with other trainers?"),
                q(
                    "session_booking",
                    "Should clients book sessions themselves?",
                    "Customer-facing booking",
                )
                .filling(SlotName::CustomerFacing)
                .enabling(&["online_booking"]),
                q("packages", "Do you sell session packages or monthly plans?", "Recurring revenue")
                    .enabling(&["memberships", "payments", "invoicing"]),
                q("progress", "Do you want to track each client's goals and progress?", "Client outcomes")
                    .enabling(&["progress_tracking"]),
                tools(),
            ],
            &["scheduling", "customer_management"],
            &["online_booking", "memberships", "payments", "progress_tracking", "reminders"],
        ),
        kit(
            "gym",
            "Gym and fitness studio",
            vec![
                team_size("How many instructors and staff do you have?"),
                q("memberships", "Do you sell memberships or class packs?", "Recurring revenue")
                    .enabling(&["memberships", "payments"]),
                q("classes", "Do you run scheduled classes that members sign up for?", "Class timetable")
                    .enabling(&["class_schedule"]),
                q(
                    "member_app",
                    "Should members manage their own bookings and billing?",
                    "Customer-facing portal",
                )
                .filling(SlotName::CustomerFacing),
                tools(),
            ],
            &["memberships", "scheduling", "payments", "invoicing"],
            &["class_schedule", "reminders", "staff_management", "reporting"],
        ),
        kit(
            "cleaning",
            "Cleaning service",
            vec![
                team_size("How many cleaners work for you?"),
                q("recurring", "Do most customers book recurring cleanings?", "Recurring visits")
                    .enabling(&["recurring_services"]),
                q(
                    "online_booking",
                    "Should customers book and pay online?",
                    "Customer-facing booking",
                )
                .filling(SlotName::CustomerFacing)
                .enabling(&["online_booking", "payments"]),
                q("crews", "Do you need to assign cleaners to each job?", "Crew assignment")
                    .enabling(&["staff_management"]),
                tools(),
            ],
            &["scheduling", "invoicing"],
            &["recurring_services", "online_booking", "payments", "staff_management", "reviews"],
        ),
        kit(
            "landscaping",
            "Landscaping",
            vec![
                team_size("How many people are on your crews?"),
                q("recurring", "Do you have weekly or seasonal maintenance customers?", "Recurring visits")
                    .enabling(&["recurring_services"]),
                q("quotes", "Do you send quotes for bigger projects?", "Quote approval flow")
                    .enabling(&["quoting"]),
                q(
                    "customer_requests",
                    "Should customers request work or see their schedule online?",
                    "Customer-facing portal",
                )
                .filling(SlotName::CustomerFacing),
                tools(),
            ],
            &["scheduling", "job_tracking", "invoicing"],
            &["recurring_services", "quoting", "staff_management", "payments"],
        ),
        kit(
            "photographer",
            "Photography",
            vec![
                team_size("Do you shoot alone, or with second shooters and editors?"),
                q("galleries", "Do you deliver photos to clients through online galleries?", "Delivery")
                    .filling(SlotName::CustomerFacing)
                    .enabling(&["photo_gallery"]),
                q("contracts", "Do clients sign a contract before the shoot?", "Booking paperwork")
                    .enabling(&["contracts"]),
                q("deposits", "Do you take deposits when a client books?", "Money flow")
                    .enabling(&["invoicing", "payments"]),
                tools(),
            ],
            &["scheduling", "customer_management"],
            &["photo_gallery", "contracts", "invoicing", "payments"],
        ),
    ]
}

/// The complete built-in catalog.
pub(super) fn data() -> CatalogData {
    CatalogData {
        default_industry: GENERAL_INDUSTRY.to_string(),
        features: features(),
        bundles: bundles(),
        kits: kits(),
    }
}
