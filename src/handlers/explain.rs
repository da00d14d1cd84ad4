use actix_web::HttpResponse;
use serde_json::json;

/// Self-describing API catalogue. No authentication required.
pub async fn explain() -> HttpResponse {
    HttpResponse::Ok().json(json!({
        "app_name": "Fit Buddy API",
        "description": "A RESTful API for fetching and storing wearable fitness data",
        "version": "1.0.0",
        "authentication": {
            "method": "Header-based authentication",
            "required_headers": {
                "X-Email": "Your wearable account email address",
                "X-Password": "Your wearable account password"
            },
            "note": "Most endpoints require authentication via X-Email and X-Password headers"
        },
        "endpoints": {
            "GET /health": {
                "description": "Health check endpoint - verify API is running",
                "authentication": false
            },
            "GET /explain": {
                "description": "This endpoint - explains the API and all available endpoints",
                "authentication": false
            },
            "GET /api/steps": {
                "description": "Get steps data for yesterday",
                "authentication": true,
                "returns": "Total steps, hourly breakdown, and user summary"
            },
            "GET /api/heartrate": {
                "description": "Get heart rate data for yesterday",
                "authentication": true,
                "returns": "Resting, average, max, and min heart rate data"
            },
            "GET /api/sleep": {
                "description": "Get sleep data for yesterday",
                "authentication": true,
                "returns": "Sleep score, duration, stages (deep/light/REM/awake), and SpO2 data"
            },
            "GET /api/stress": {
                "description": "Get stress distribution and statistics for yesterday",
                "authentication": true,
                "returns": "Stress distribution (rest/low/medium/high), average stress, and sample series"
            },
            "GET /api/bodybattery": {
                "description": "Get body battery data for yesterday",
                "authentication": true,
                "returns": "Body battery charged and drained levels"
            },
            "GET /api/activities": {
                "description": "Get activities/exercises for yesterday",
                "authentication": true,
                "returns": "List of activities with details (distance, calories, heart rate, speed, etc.)"
            },
            "GET /api/healthmetrics": {
                "description": "Get comprehensive health metrics for yesterday",
                "authentication": true,
                "returns": "VO2 Max, fitness age, HRV, training readiness, hydration, intensity minutes, floors climbed, SpO2, respiration"
            },
            "GET /api/all": {
                "description": "Get all fitness data combined in one response",
                "authentication": true,
                "returns": "Combined data from all endpoints"
            },
            "POST /api/sync/{date}": {
                "description": "Sync all data for a specific date to the database",
                "authentication": true,
                "url_parameter": "date (format: YYYY-MM-DD, e.g., 2026-01-15)",
                "returns": "Sync status for all data types and summary of stored data"
            },
            "GET /api/db/{data_type}": {
                "description": "Get data from database for a specific date",
                "authentication": false,
                "url_parameter": "data_type (one of: steps, heartrate, sleep, stress, bodybattery, activities, healthmetrics)",
                "query_parameters": {
                    "email": "User email address (required)",
                    "date": "Date in format YYYY-MM-DD (required)"
                }
            },
            "GET /api/db/{data_type}/range": {
                "description": "Get a date range of stored data (dashboard token required)",
                "authentication": true,
                "query_parameters": {
                    "start_date": "Start date YYYY-MM-DD (inclusive)",
                    "end_date": "End date YYYY-MM-DD (inclusive)"
                }
            },
            "POST /api/auth/login": {
                "description": "Dashboard login, answers a signed session token",
                "authentication": false
            },
            "GET /api/auth/verify": {
                "description": "Verify a dashboard session token",
                "authentication": true
            },
            "GET /api/live": {
                "description": "Live data for today using server-stored credentials (dashboard token required)",
                "authentication": true
            }
        },
        "error_responses": {
            "400": "Bad Request - Invalid parameters or credentials format",
            "401": "Unauthorized - Missing or invalid authentication credentials",
            "404": "Not Found - No stored data for the requested key",
            "429": "Too Many Requests - Rate limit exceeded",
            "500": "Internal Server Error - Server-side error occurred",
            "503": "Service Unavailable - Wearable provider unavailable"
        }
    }))
}
