use crate::common::mock_server::{MockServerConfiguration, MockServerStorage, API_ERROR_HEADER};
use actix_web::{web, HttpRequest, HttpResponse};
use chrono::Utc;
use serde_json::{json, Value};
use std::collections::HashMap;
use uuid::Uuid;

type Params = HashMap<String, String>;

fn api_error(status: actix_web::http::StatusCode, code: &str, message: &str) -> HttpResponse {
    HttpResponse::build(status)
        .insert_header((API_ERROR_HEADER, code))
        .json(json!({ "code": code, "message": message }))
}

fn missing(field: &str) -> HttpResponse {
    HttpResponse::BadRequest()
        .insert_header((API_ERROR_HEADER, "err_missing_params"))
        .json(json!({ "code": "err_missing_params", "message": "Missing parameter", "extra": field }))
}

fn is_reset(req: &HttpRequest) -> bool {
    req.headers().contains_key("X-RESET")
}

fn amount(params: &Params) -> Option<f64> {
    params.get("amount").and_then(|amount| amount.parse().ok())
}

/// POST /
pub(super) async fn login(
    configuration: web::Data<MockServerConfiguration>,
    storage: web::Data<MockServerStorage>,
    form: web::Form<Params>,
) -> HttpResponse {
    if form.get("apiToken") != Some(&configuration.api_key) {
        // Twikey answers a failed login without a session token
        return HttpResponse::Ok()
            .insert_header((API_ERROR_HEADER, "Invalid apiToken"))
            .finish();
    }

    let token = Uuid::new_v4().to_string();
    let mut storage = storage.write().unwrap();
    storage.session_tokens.insert(token.clone());
    storage.logins += 1;

    HttpResponse::Ok()
        .insert_header(("Authorization", token))
        .finish()
}

/// POST /invite
pub(super) async fn invite(
    configuration: web::Data<MockServerConfiguration>,
    storage: web::Data<MockServerStorage>,
    form: web::Form<Params>,
) -> HttpResponse {
    match form.get("ct").and_then(|ct| ct.parse::<u64>().ok()) {
        Some(ct) if ct == configuration.ct => {}
        Some(_) => {
            return api_error(
                actix_web::http::StatusCode::BAD_REQUEST,
                "err_no_contract",
                "No template found",
            )
        }
        None => return missing("ct"),
    }

    let mut storage = storage.write().unwrap();
    let mandate_number = format!("MNDT{:05}", storage.next_id());
    let name = match (form.get("firstname"), form.get("lastname")) {
        (Some(first), Some(last)) => Some(format!("{} {}", first, last)),
        (first, last) => first.or(last).cloned(),
    };

    let mndt = json!({
        "MndtId": mandate_number,
        "LclInstrm": "CORE",
        "Ocrncs": { "SeqTp": "RCUR" },
        "Dbtr": {
            "Nm": name,
            "PstlAdr": {
                "AdrLine": form.get("address"),
                "TwnNm": form.get("city"),
                "PstCd": form.get("zip"),
                "Ctry": form.get("country"),
            },
            "CtctDtls": {
                "EmailAdr": form.get("email"),
                "Othr": form.get("customerNumber"),
            },
        },
        "DbtrAcct": form.get("iban"),
        "DbtrAgt": { "FinInstnId": { "BICFI": form.get("bic") } },
        "RfrdDoc": form.get("contractNumber"),
        "SplmtryData": [
            { "Key": "Language", "Value": form.get("l").cloned().unwrap_or_else(|| "en".to_string()) }
        ],
    });
    storage
        .mandates
        .insert(mandate_number.clone(), (mndt, "PREPARED".to_string()));

    HttpResponse::Ok().json(json!({
        "mndtId": mandate_number,
        "url": format!("https://twikey.mock/p/{}", mandate_number),
        "key": Uuid::new_v4().to_string(),
    }))
}

/// GET /mandate/detail
pub(super) async fn mandate_details(
    storage: web::Data<MockServerStorage>,
    query: web::Query<Params>,
) -> HttpResponse {
    let mandate_number = match query.get("mndtId") {
        Some(mandate_number) => mandate_number,
        None => return missing("mndtId"),
    };
    let force = query.get("force").map_or(false, |force| force == "true");

    match storage.read().unwrap().mandates.get(mandate_number) {
        Some((mndt, state)) if force || state != "PREPARED" => HttpResponse::Ok()
            .insert_header(("X-STATE", state.as_str()))
            .json(json!({ "Mndt": mndt })),
        _ => api_error(
            actix_web::http::StatusCode::NOT_FOUND,
            "err_no_contract",
            "No mandate found",
        ),
    }
}

/// DELETE /mandate
pub(super) async fn cancel_mandate(
    storage: web::Data<MockServerStorage>,
    query: web::Query<Params>,
) -> HttpResponse {
    let (mandate_number, reason) = match (query.get("mndtId"), query.get("rsn")) {
        (Some(mandate_number), Some(reason)) => (mandate_number, reason),
        (None, _) => return missing("mndtId"),
        (_, None) => return missing("rsn"),
    };

    let mut storage = storage.write().unwrap();
    if storage.mandates.remove(mandate_number).is_none() {
        return api_error(
            actix_web::http::StatusCode::NOT_FOUND,
            "err_no_contract",
            "No mandate found",
        );
    }
    storage.mandate_feed.push(json!({
        "OrgnlMndtId": mandate_number,
        "CxlRsn": { "Rsn": reason, "Orgtr": { "Nm": "Creditor" } },
        "EvtTime": Utc::now().to_rfc3339(),
    }));

    HttpResponse::Ok().finish()
}

/// GET /mandate
pub(super) async fn mandate_feed(
    req: HttpRequest,
    storage: web::Data<MockServerStorage>,
) -> HttpResponse {
    let messages = storage
        .write()
        .unwrap()
        .mandate_feed
        .next_page(is_reset(&req));

    HttpResponse::Ok().json(json!({ "Messages": messages }))
}

/// POST /invoice
pub(super) async fn create_invoice(
    storage: web::Data<MockServerStorage>,
    body: web::Json<Value>,
) -> HttpResponse {
    let mut invoice = body.into_inner();
    for field in ["number", "amount", "date", "duedate"] {
        if invoice.get(field).is_none() {
            return missing(field);
        }
    }

    let id = invoice
        .get("id")
        .and_then(Value::as_str)
        .map(str::to_string)
        .unwrap_or_else(|| Uuid::new_v4().to_string());
    invoice["id"] = json!(id);
    invoice["state"] = json!("BOOKED");
    invoice["url"] = json!(format!("https://twikey.mock/i/{}", id));

    let mut storage = storage.write().unwrap();
    if storage.invoices.contains_key(&id) {
        return api_error(
            actix_web::http::StatusCode::CONFLICT,
            "err_duplicate_invoice",
            "Invoice already exists",
        );
    }
    storage.invoices.insert(id, invoice.clone());
    storage.invoice_feed.push(invoice.clone());

    HttpResponse::Ok().json(invoice)
}

/// GET /invoice/{id}
pub(super) async fn get_invoice(
    storage: web::Data<MockServerStorage>,
    path: web::Path<String>,
) -> HttpResponse {
    let id = path.into_inner();

    storage.read().unwrap().invoices.get(&id).map_or_else(
        || {
            api_error(
                actix_web::http::StatusCode::NOT_FOUND,
                "err_not_found",
                "Invoice not found",
            )
        },
        |invoice| HttpResponse::Ok().json(invoice),
    )
}

/// GET /invoice
pub(super) async fn invoice_feed(
    req: HttpRequest,
    storage: web::Data<MockServerStorage>,
) -> HttpResponse {
    let invoices = storage
        .write()
        .unwrap()
        .invoice_feed
        .next_page(is_reset(&req));

    HttpResponse::Ok().json(json!({ "Invoices": invoices }))
}

/// POST /transaction
pub(super) async fn create_transaction(
    storage: web::Data<MockServerStorage>,
    form: web::Form<Params>,
) -> HttpResponse {
    let mandate_number = match form.get("mndtId") {
        Some(mandate_number) => mandate_number,
        None => return missing("mndtId"),
    };
    let amount = match amount(&form) {
        Some(amount) if amount > 0.0 => amount,
        _ => return missing("amount"),
    };

    let mut storage = storage.write().unwrap();
    if !storage.mandates.contains_key(mandate_number) {
        return api_error(
            actix_web::http::StatusCode::BAD_REQUEST,
            "err_no_contract",
            "No mandate found",
        );
    }

    let transaction = json!({
        "id": storage.next_id(),
        "mndtId": mandate_number,
        "amount": amount,
        "msg": form.get("message"),
        "ref": form.get("ref"),
        "place": form.get("place"),
        "date": form.get("date").cloned().unwrap_or_else(|| Utc::now().format("%Y-%m-%d").to_string()),
        "state": "OPEN",
        "final": false,
    });
    storage.transactions.push(transaction.clone());
    storage.transaction_feed.push(transaction.clone());

    HttpResponse::Ok().json(json!({ "Entries": [transaction] }))
}

/// GET /transaction/detail
pub(super) async fn transaction_status(
    storage: web::Data<MockServerStorage>,
    query: web::Query<Params>,
) -> HttpResponse {
    let matches = |transaction: &&Value| {
        let field_matches = |param: &str, field: &str| match query.get(param) {
            Some(expected) => match &transaction[field] {
                Value::String(actual) => actual == expected,
                Value::Number(actual) => &actual.to_string() == expected,
                _ => false,
            },
            None => true,
        };
        field_matches("id", "id") && field_matches("ref", "ref") && field_matches("mndtId", "mndtId")
    };

    let entries: Vec<Value> = storage
        .read()
        .unwrap()
        .transactions
        .iter()
        .filter(matches)
        .cloned()
        .collect();

    HttpResponse::Ok().json(json!({ "Entries": entries }))
}

/// GET /transaction
pub(super) async fn transaction_feed(
    req: HttpRequest,
    storage: web::Data<MockServerStorage>,
) -> HttpResponse {
    let entries = storage
        .write()
        .unwrap()
        .transaction_feed
        .next_page(is_reset(&req));

    HttpResponse::Ok().json(json!({ "Entries": entries }))
}

/// POST /payment/link
pub(super) async fn create_paylink(
    configuration: web::Data<MockServerConfiguration>,
    storage: web::Data<MockServerStorage>,
    form: web::Form<Params>,
) -> HttpResponse {
    if form.get("ct").and_then(|ct| ct.parse::<u64>().ok()) != Some(configuration.ct) {
        return api_error(
            actix_web::http::StatusCode::BAD_REQUEST,
            "err_no_contract",
            "No template found",
        );
    }
    let amount = match amount(&form) {
        Some(amount) => amount,
        None => return missing("amount"),
    };

    let mut storage = storage.write().unwrap();
    let id = storage.next_id();
    let link = json!({
        "id": id,
        "amount": amount,
        "msg": form.get("message"),
        "ref": form.get("ref"),
        "url": format!("https://twikey.mock/l/{}", id),
        "state": "created",
    });
    storage.paylinks.push(link.clone());
    storage.paylink_feed.push(link.clone());

    HttpResponse::Ok().json(link)
}

/// GET /payment/link
pub(super) async fn paylink_status(
    storage: web::Data<MockServerStorage>,
    query: web::Query<Params>,
) -> HttpResponse {
    let links: Vec<Value> = storage
        .read()
        .unwrap()
        .paylinks
        .iter()
        .filter(|link| {
            query
                .get("id")
                .map_or(true, |id| link["id"].to_string() == *id)
                && query
                    .get("ref")
                    .map_or(true, |reference| link["ref"].as_str() == Some(reference.as_str()))
        })
        .cloned()
        .collect();

    HttpResponse::Ok().json(json!({ "Links": links }))
}

/// GET /payment/link/feed
pub(super) async fn paylink_feed(
    req: HttpRequest,
    storage: web::Data<MockServerStorage>,
) -> HttpResponse {
    let links = storage
        .write()
        .unwrap()
        .paylink_feed
        .next_page(is_reset(&req));

    HttpResponse::Ok().json(json!({ "Links": links }))
}

/// POST /transfers/beneficiaries
pub(super) async fn add_beneficiary(
    storage: web::Data<MockServerStorage>,
    form: web::Form<Params>,
) -> HttpResponse {
    let iban = match form.get("iban") {
        Some(iban) => iban,
        None => return missing("iban"),
    };

    let beneficiary = json!({
        "name": form.get("name"),
        "iban": iban,
        "bic": form.get("bic"),
        "available": true,
        "address": {
            "street": form.get("address"),
            "city": form.get("city"),
            "zip": form.get("zip"),
            "country": form.get("country"),
        },
    });

    let customer_number = form.get("customerNumber").cloned().unwrap_or_default();
    storage
        .write()
        .unwrap()
        .beneficiaries
        .entry(customer_number)
        .or_default()
        .push(beneficiary.clone());

    HttpResponse::Ok().json(beneficiary)
}

/// POST /transfer
pub(super) async fn create_refund(
    storage: web::Data<MockServerStorage>,
    form: web::Form<Params>,
) -> HttpResponse {
    let customer_number = match form.get("customerNumber") {
        Some(customer_number) => customer_number,
        None => return missing("customerNumber"),
    };
    let amount = match amount(&form) {
        Some(amount) => amount,
        None => return missing("amount"),
    };

    let mut storage = storage.write().unwrap();

    // The beneficiary account must be known, and unique unless an IBAN is given
    let accounts = storage
        .beneficiaries
        .get(customer_number)
        .cloned()
        .unwrap_or_default();
    let account = match form.get("iban") {
        Some(iban) => accounts
            .into_iter()
            .find(|account| account["iban"].as_str() == Some(iban.as_str())),
        None if accounts.len() == 1 => accounts.into_iter().next(),
        None => None,
    };
    let account = match account {
        Some(account) => account,
        None => {
            return api_error(
                actix_web::http::StatusCode::BAD_REQUEST,
                "err_no_beneficiary",
                "No beneficiary account found",
            )
        }
    };

    let refund = json!({
        "id": Uuid::new_v4().to_string(),
        "iban": account["iban"],
        "bic": account["bic"],
        "amount": amount,
        "msg": form.get("message"),
        "ref": form.get("ref"),
        "place": form.get("place"),
        "date": Utc::now().format("%Y-%m-%d").to_string(),
        "state": "OPEN",
    });
    storage.refund_feed.push(refund.clone());

    HttpResponse::Ok().json(json!({ "Entries": [refund] }))
}

/// GET /transfer
pub(super) async fn refund_feed(
    req: HttpRequest,
    storage: web::Data<MockServerStorage>,
) -> HttpResponse {
    let entries = storage
        .write()
        .unwrap()
        .refund_feed
        .next_page(is_reset(&req));

    HttpResponse::Ok().json(json!({ "Entries": entries }))
}
